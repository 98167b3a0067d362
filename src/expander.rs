//! `$NAME` substitution against the shell's [`Environment`].

use crate::environment::Environment;

/// Expands every `$NAME` span in `input` in a single left-to-right pass.
///
/// A name is the maximal run of alphanumeric/underscore characters after the
/// `$`. Absent names expand to the empty string, as does a `$` with no name
/// at all. Two specials bypass the table: `$$` is the shell's process id and
/// `$?` is the status of the last dispatched command (stored under `"?"`).
/// Substituted text is not re-scanned, so values containing `$` come through
/// verbatim.
pub fn expand(input: &str, env: &Environment) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < chars.len() {
        if chars[pos] != '$' {
            out.push(chars[pos]);
            pos += 1;
            continue;
        }

        let mut end = pos + 1;
        while end < chars.len() && is_name_char(chars[end]) {
            end += 1;
        }

        if end > pos + 1 {
            let name: String = chars[pos + 1..end].iter().collect();
            out.push_str(env.get(&name));
            pos = end;
        } else {
            match chars.get(end) {
                Some('$') => {
                    out.push_str(&nix::unistd::getpid().to_string());
                    pos = end + 1;
                }
                Some('?') => {
                    out.push_str(env.get("?"));
                    pos = end + 1;
                }
                // Empty-name lookup: the `$` itself expands to nothing.
                _ => pos = end,
            }
        }
    }

    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
