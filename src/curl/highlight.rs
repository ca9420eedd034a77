//! Terminal highlighting for generated commands

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const BOLD_YELLOW: &str = "\x1b[1;33m";

/// Colorize a generated curl command: program name, flags and quoted values
pub fn format_curl_pretty(cmd: &str) -> String {
    let mut result = String::with_capacity(cmd.len() + 32);
    let mut rest = cmd;

    if let Some(tail) = rest.strip_prefix(super::CURL) {
        result.push_str(BOLD_YELLOW);
        result.push_str(super::CURL);
        result.push_str(RESET);
        rest = tail;
    }

    let mut in_string = false;
    let mut in_flag = false;
    let mut token_start = false;
    let mut chars = rest.chars();

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '\'' {
                result.push_str(RESET);
                in_string = false;
            }
            continue;
        }

        if in_flag && (c.is_whitespace() || c == '\'') {
            result.push_str(RESET);
            in_flag = false;
        }

        match c {
            '\'' => {
                result.push_str(GREEN);
                result.push(c);
                in_string = true;
            }
            '\\' => {
                result.push(c);
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            '-' if token_start => {
                result.push_str(CYAN);
                result.push(c);
                in_flag = true;
            }
            _ => result.push(c),
        }

        token_start = c == ' ' || c == '\n';
    }

    if in_flag || in_string {
        result.push_str(RESET);
    }

    result
}
