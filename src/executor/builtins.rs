//! The builtin command table.
//!
//! One canonical table, one handler signature. Handlers return their output
//! as data instead of printing, so the dispatcher (and the tests) decide
//! what reaches the terminal; the only exception is `clear`, whose escape
//! sequence goes straight out.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::context::ShellContext;
use crate::expander;

use super::dispatch::{ExecError, ExecOutcome, ExecStatus};

type BuiltinFn = fn(&[String], &mut ShellContext) -> ExecStatus;

pub struct Builtins {
    table: HashMap<&'static str, BuiltinFn>,
}

impl Builtins {
    pub fn new() -> Self {
        let mut table: HashMap<&'static str, BuiltinFn> = HashMap::new();
        table.insert("cd", cd);
        table.insert("pwd", pwd);
        table.insert("echo", echo);
        table.insert("exit", exit);
        table.insert("set", set);
        table.insert("unset", unset);
        table.insert("history", history);
        table.insert("clear", clear);
        Builtins { table }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn run(&self, name: &str, args: &[String], ctx: &mut ShellContext) -> ExecStatus {
        match self.table.get(name) {
            Some(handler) => handler(args, ctx),
            None => Err(ExecError::CommandNotFound(name.to_string())),
        }
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Builtins::new()
    }
}

/// `cd [path]` — no path means `$HOME`. On success `PWD` follows the
/// canonical form of wherever the process actually landed; on failure
/// nothing changes.
fn cd(args: &[String], ctx: &mut ShellContext) -> ExecStatus {
    let target = match args.first() {
        Some(path) => path.clone(),
        None => ctx.env.get("HOME").to_string(),
    };

    std::env::set_current_dir(&target).map_err(|source| ExecError::Chdir {
        path: target.clone(),
        source,
    })?;

    let cwd = std::env::current_dir().map_err(ExecError::CurrentDir)?;
    ctx.env.set("PWD", &cwd.display().to_string());
    Ok(ExecOutcome::completed(0))
}

fn pwd(_args: &[String], _ctx: &mut ShellContext) -> ExecStatus {
    let cwd = std::env::current_dir().map_err(ExecError::CurrentDir)?;
    Ok(ExecOutcome::with_output(cwd.display().to_string(), 0))
}

/// `echo [words...]` — joins with single spaces and expands variables.
fn echo(args: &[String], ctx: &mut ShellContext) -> ExecStatus {
    let joined = args.join(" ");
    Ok(ExecOutcome::with_output(
        expander::expand(&joined, &ctx.env),
        0,
    ))
}

/// `exit [code]` — requests loop exit; the terminal is restored on the way
/// out. A non-numeric code is a usage error and the shell keeps running.
fn exit(args: &[String], _ctx: &mut ShellContext) -> ExecStatus {
    match args.first() {
        None => Ok(ExecOutcome::Exit { code: 0 }),
        Some(code) => match code.parse::<i32>() {
            Ok(code) => Ok(ExecOutcome::Exit { code }),
            Err(_) => Err(ExecError::Usage(format!(
                "exit: {code}: numeric argument required"
            ))),
        },
    }
}

/// `set name value...` — everything after the name joins into one value,
/// which is expanded before it is stored.
fn set(args: &[String], ctx: &mut ShellContext) -> ExecStatus {
    if args.len() < 2 {
        return Err(ExecError::Usage("set: usage: set NAME VALUE".to_string()));
    }
    let value = expander::expand(&args[1..].join(" "), &ctx.env);
    ctx.env.set(&args[0], &value);
    Ok(ExecOutcome::completed(0))
}

fn unset(args: &[String], ctx: &mut ShellContext) -> ExecStatus {
    let Some(name) = args.first() else {
        return Err(ExecError::Usage("unset: usage: unset NAME".to_string()));
    };
    ctx.env.unset(name);
    Ok(ExecOutcome::completed(0))
}

/// `history` — all recorded lines, 0-based.
fn history(_args: &[String], ctx: &mut ShellContext) -> ExecStatus {
    if ctx.history.is_empty() {
        return Ok(ExecOutcome::completed(0));
    }
    let listing = ctx
        .history
        .list()
        .iter()
        .enumerate()
        .map(|(index, line)| format!("{index}: {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(ExecOutcome::with_output(listing, 0))
}

/// `clear` — ANSI clear-screen plus cursor home.
fn clear(_args: &[String], _ctx: &mut ShellContext) -> ExecStatus {
    let mut stdout = io::stdout();
    stdout.write_all(b"\x1b[2J\x1b[H")?;
    stdout.flush()?;
    Ok(ExecOutcome::completed(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // `cd`/`pwd` tests move the process-wide working directory; serialize
    // them so the parallel test harness cannot interleave.
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_contains_every_builtin() {
        let builtins = Builtins::new();
        for name in ["cd", "pwd", "echo", "exit", "set", "unset", "history", "clear"] {
            assert!(builtins.contains(name), "missing builtin {name}");
        }
        assert!(!builtins.contains("ls"));
    }

    #[test]
    fn test_cd_updates_pwd_to_canonical_path() {
        let _guard = CWD_LOCK.lock().unwrap();
        let original = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ShellContext::default();

        let outcome = cd(&args(&[dir.path().to_str().unwrap()]), &mut ctx).unwrap();
        assert_eq!(outcome, ExecOutcome::completed(0));
        let landed = std::env::current_dir().unwrap();
        assert_eq!(ctx.env.get("PWD"), landed.display().to_string());

        std::env::set_current_dir(original).unwrap();
    }

    #[test]
    fn test_cd_failure_leaves_state_unchanged() {
        let _guard = CWD_LOCK.lock().unwrap();
        let before = std::env::current_dir().unwrap();
        let mut ctx = ShellContext::default();
        ctx.env.set("PWD", "/before");

        let err = cd(&args(&["/no/such/directory/anywhere"]), &mut ctx).unwrap_err();
        assert!(matches!(err, ExecError::Chdir { .. }));
        assert_ne!(err.status(), 0);
        assert_eq!(ctx.env.get("PWD"), "/before");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_without_path_goes_home() {
        let _guard = CWD_LOCK.lock().unwrap();
        let original = std::env::current_dir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let mut ctx = ShellContext::default();
        ctx.env.set("HOME", home.path().to_str().unwrap());

        cd(&[], &mut ctx).unwrap();
        assert_eq!(
            ctx.env.get("PWD"),
            std::env::current_dir().unwrap().display().to_string()
        );

        std::env::set_current_dir(original).unwrap();
    }

    #[test]
    fn test_pwd_reports_current_directory() {
        let _guard = CWD_LOCK.lock().unwrap();
        let mut ctx = ShellContext::default();
        let expected = std::env::current_dir().unwrap().display().to_string();
        let outcome = pwd(&[], &mut ctx).unwrap();
        assert_eq!(outcome, ExecOutcome::with_output(expected, 0));
    }

    #[test]
    fn test_echo_joins_and_expands() {
        let mut ctx = ShellContext::default();
        ctx.env.set("NAME", "world");
        let outcome = echo(&args(&["hello,", "$NAME"]), &mut ctx).unwrap();
        assert_eq!(outcome, ExecOutcome::with_output("hello, world", 0));
    }

    #[test]
    fn test_echo_with_no_arguments_is_empty() {
        let mut ctx = ShellContext::default();
        let outcome = echo(&[], &mut ctx).unwrap();
        assert_eq!(outcome, ExecOutcome::with_output("", 0));
    }

    #[test]
    fn test_exit_codes() {
        let mut ctx = ShellContext::default();
        assert_eq!(exit(&[], &mut ctx).unwrap(), ExecOutcome::Exit { code: 0 });
        assert_eq!(
            exit(&args(&["3"]), &mut ctx).unwrap(),
            ExecOutcome::Exit { code: 3 }
        );
    }

    #[test]
    fn test_exit_rejects_non_numeric_code() {
        let mut ctx = ShellContext::default();
        let err = exit(&args(&["lots"]), &mut ctx).unwrap_err();
        assert!(matches!(err, ExecError::Usage(_)));
        assert_eq!(err.status(), 2);
    }

    #[test]
    fn test_set_requires_name_and_value() {
        let mut ctx = ShellContext::default();
        assert!(matches!(
            set(&args(&["ONLY_NAME"]), &mut ctx),
            Err(ExecError::Usage(_))
        ));
        assert!(matches!(set(&[], &mut ctx), Err(ExecError::Usage(_))));
    }

    #[test]
    fn test_set_joins_and_expands_value() {
        let mut ctx = ShellContext::default();
        ctx.env.set("WHO", "world");
        set(&args(&["GREETING", "hello", "$WHO"]), &mut ctx).unwrap();
        assert_eq!(ctx.env.get("GREETING"), "hello world");
    }

    #[test]
    fn test_unset_removes_and_requires_operand() {
        let mut ctx = ShellContext::default();
        ctx.env.set("DOOMED", "x");
        unset(&args(&["DOOMED"]), &mut ctx).unwrap();
        assert_eq!(ctx.env.get("DOOMED"), "");
        assert!(matches!(unset(&[], &mut ctx), Err(ExecError::Usage(_))));
    }

    #[test]
    fn test_history_lists_zero_based() {
        let mut ctx = ShellContext::default();
        ctx.history.add("ls");
        ctx.history.add("pwd");
        let outcome = history(&[], &mut ctx).unwrap();
        assert_eq!(outcome, ExecOutcome::with_output("0: ls\n1: pwd", 0));
    }

    #[test]
    fn test_history_when_empty_prints_nothing() {
        let mut ctx = ShellContext::default();
        assert_eq!(history(&[], &mut ctx).unwrap(), ExecOutcome::completed(0));
    }
}
