use egui_code_editor::Syntax;
use std::collections::BTreeSet;

/// El contenido todavía contiene el token centinela del editor: estado
/// intermedio que no debe enviarse.
pub fn contains_sentinel(latex: &str, sentinel: &str) -> bool {
    !sentinel.is_empty() && latex.contains(sentinel)
}

pub fn normalize_expression(latex: &str) -> String {
    latex.trim().to_string()
}

/// Enter solo envía mensajes no vacíos y por debajo del límite.
pub fn accepts_chat_message(latex: &str, max_len: usize) -> bool {
    let len = latex.trim().chars().count();
    len > 0 && len < max_len
}

pub fn latex_syntax() -> Syntax {
    Syntax::new("latex")
        .with_case_sensitive(true)
        .with_comment("%")
        .with_keywords(BTreeSet::from([
            "frac", "sqrt", "cdot", "times", "div", "left", "right", "pm",
        ]))
        .with_types(BTreeSet::from(["x", "y", "z", "a", "b", "c", "n"]))
        .with_special(BTreeSet::from(["=", "^", "_"]))
}

/// Versión legible de una expresión LaTeX para las burbujas estáticas.
pub fn latex_to_display(latex: &str) -> String {
    let mut out = latex.trim().to_string();
    for (from, to) in [
        ("\\left(", "("),
        ("\\right)", ")"),
        ("\\left[", "["),
        ("\\right]", "]"),
        ("\\cdot", "·"),
        ("\\times", "×"),
        ("\\div", "÷"),
        ("\\pm", "±"),
        ("\\ ", " "),
    ] {
        out = out.replace(from, to);
    }
    out = replace_command_with_two_args(&out, "\\frac", |num, den| format!("({num})/({den})"));
    out = replace_command_with_one_arg(&out, "\\sqrt", |arg| format!("√({arg})"));
    // ^{2} -> ^2 cuando el exponente es simple
    out = simplify_braced_scripts(&out);
    out
}

fn take_braced(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('{')?;
    let mut depth = 1usize;
    for (i, ch) in rest.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&rest[..i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn replace_command_with_two_args(
    input: &str,
    command: &str,
    render: impl Fn(&str, &str) -> String + Copy,
) -> String {
    let Some(start) = input.find(command) else {
        return input.to_string();
    };
    let after = &input[start + command.len()..];
    let parsed = take_braced(after).and_then(|(a, rest)| take_braced(rest).map(|(b, rest)| (a, b, rest)));
    match parsed {
        Some((a, b, rest)) => {
            let a = replace_command_with_two_args(a, command, render);
            let b = replace_command_with_two_args(b, command, render);
            format!(
                "{}{}{}",
                &input[..start],
                render(&a, &b),
                replace_command_with_two_args(rest, command, render)
            )
        }
        None => input.to_string(),
    }
}

fn replace_command_with_one_arg(
    input: &str,
    command: &str,
    render: impl Fn(&str) -> String + Copy,
) -> String {
    let Some(start) = input.find(command) else {
        return input.to_string();
    };
    let after = &input[start + command.len()..];
    match take_braced(after) {
        Some((arg, rest)) => {
            let arg = replace_command_with_one_arg(arg, command, render);
            format!(
                "{}{}{}",
                &input[..start],
                render(&arg),
                replace_command_with_one_arg(rest, command, render)
            )
        }
        None => input.to_string(),
    }
}

fn simplify_braced_scripts(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(['^', '_']) {
        out.push_str(&rest[..=pos]);
        let tail = &rest[pos + 1..];
        match take_braced(tail) {
            Some((inner, after)) if inner.chars().count() == 1 => {
                out.push_str(inner);
                rest = after;
            }
            Some((inner, after)) => {
                out.push('(');
                out.push_str(inner);
                out.push(')');
                rest = after;
            }
            None => rest = tail,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: &str = "randomstringnoonewillevertypeinhopefully";

    #[test]
    fn sentinel_is_detected_anywhere() {
        assert!(contains_sentinel("x+randomstringnoonewillevertypeinhopefully", SENTINEL));
        assert!(!contains_sentinel("x+1", SENTINEL));
        assert!(!contains_sentinel("x+1", ""));
    }

    #[test]
    fn chat_message_limits() {
        assert!(!accepts_chat_message("   ", 250));
        assert!(accepts_chat_message("2+2", 250));
        assert!(!accepts_chat_message(&"1".repeat(250), 250));
        assert!(accepts_chat_message(&"1".repeat(249), 250));
    }

    #[test]
    fn display_handles_fractions_and_powers() {
        assert_eq!(latex_to_display("\\frac{x}{2}=3"), "(x)/(2)=3");
        assert_eq!(latex_to_display("x^{2}\\cdot y"), "x^2· y");
        assert_eq!(latex_to_display("x^{10}"), "x^(10)");
        assert_eq!(latex_to_display("\\sqrt{\\frac{1}{4}}"), "√((1)/(4))");
    }

    #[test]
    fn unbalanced_input_is_left_alone() {
        assert_eq!(latex_to_display("\\frac{x"), "\\frac{x");
    }
}
