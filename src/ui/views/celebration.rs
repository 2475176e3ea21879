use egui::{Color32, Context, Id, LayerId, Order, Pos2, Stroke, vec2};

const PARTICLES: usize = 48;
const COLORS: [Color32; 4] = [
    Color32::from_rgb(255, 193, 7),
    Color32::from_rgb(40, 167, 69),
    Color32::from_rgb(13, 202, 240),
    Color32::from_rgb(220, 53, 69),
];

/// Estallido de confeti al resolver el problema. `progress` va de 0 a 1.
pub fn paint_celebration(ctx: &Context, progress: f32) {
    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("celebration")));
    let rect = ctx.screen_rect();
    let origin = Pos2::new(rect.center().x, rect.bottom());
    let fade = 1.0 - progress;

    for i in 0..PARTICLES {
        // Ángulo y velocidad fijos por partícula: siempre el mismo dibujo.
        let angle = std::f32::consts::PI * (0.15 + 0.7 * (i as f32 / PARTICLES as f32));
        let speed = rect.height() * (0.6 + 0.4 * (((i * 7) % 11) as f32 / 11.0));
        let t = progress;
        let offset = vec2(angle.cos() * speed * t, -angle.sin() * speed * t + 0.9 * speed * t * t);
        let color = COLORS[i % COLORS.len()].gamma_multiply(fade);
        painter.circle(origin + offset, 5.0, color, Stroke::NONE);
    }

    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "🎉 Problem solved!",
        egui::FontId::proportional(36.0),
        Color32::WHITE.gamma_multiply(fade),
    );
}
