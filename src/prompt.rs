//! Prompt rendering.

use crate::environment::Environment;
use crate::expander;

/// Renders the prompt from the `PS1` template in the environment.
///
/// The template is re-expanded on every draw rather than cached on `set`, so
/// `cd` and `set PS1 ...` take effect at the very next prompt.
pub struct ShellPrompt;

impl ShellPrompt {
    pub fn new() -> Self {
        ShellPrompt
    }

    pub fn render(&self, env: &Environment) -> String {
        expander::expand(env.get("PS1"), env)
    }
}

impl Default for ShellPrompt {
    fn default() -> Self {
        ShellPrompt::new()
    }
}
