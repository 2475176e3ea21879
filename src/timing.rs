//! Temporizadores sobre un reloj explícito (segundos, `f64`).
//!
//! La UI pasa `ctx.input(|i| i.time)` en cada frame; los tests pasan un reloj
//! manual. Nada de esto duerme ni crea hilos.

/// Temporizador de silencio cancelable. Cada `restart` descarta el disparo
/// pendiente y vuelve a contar desde `now`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Debouncer {
    quiet: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(quiet_secs: f64) -> Self {
        Self {
            quiet: quiet_secs,
            deadline: None,
        }
    }

    pub fn restart(&mut self, now: f64) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Devuelve `true` una sola vez, cuando ha vencido el plazo.
    pub fn fire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|d| (d - now).max(0.0))
    }
}

/// Bloqueo temporal tras una acción (p. ej. el popup de ayuda).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cooldown {
    until: Option<f64>,
}

impl Cooldown {
    pub fn start(&mut self, now: f64, secs: f64) {
        self.until = Some(now + secs);
    }

    pub fn is_active(&self, now: f64) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

/// Calendario de aparición de las burbujas de una respuesta: la burbuja `k`
/// (1-based) se muestra en `start + k * interval`; el ciclo termina en
/// `start + n * interval + settle`.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealSchedule {
    start: f64,
    interval: f64,
    settle: f64,
    total: usize,
}

impl RevealSchedule {
    pub fn new(start: f64, interval: f64, settle: f64, total: usize) -> Self {
        Self {
            start,
            interval,
            settle,
            total,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Cuántas burbujas tienen el contenido visible en `now`.
    pub fn revealed_at(&self, now: f64) -> usize {
        if self.interval <= 0.0 {
            return self.total;
        }
        let elapsed = (now - self.start).max(0.0);
        ((elapsed / self.interval).floor() as usize).min(self.total)
    }

    pub fn finish_time(&self) -> f64 {
        self.start + self.total as f64 * self.interval + self.settle
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.finish_time()
    }

    /// Próximo instante en el que cambia algo (para pedir repintado).
    pub fn next_event(&self, now: f64) -> Option<f64> {
        let revealed = self.revealed_at(now);
        if revealed < self.total {
            Some(self.start + (revealed + 1) as f64 * self.interval)
        } else if !self.is_finished(now) {
            Some(self.finish_time())
        } else {
            None
        }
    }
}
