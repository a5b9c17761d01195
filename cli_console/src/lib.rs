//! # CLI Console
//!
//! A small interactive shell over the RAMFS store.
//!
//! Keyboard bytes come in through the syscall layer (descriptor 0), go
//! through the line editor, and finished lines are dispatched to the command
//! handler. All output, echo included, leaves through descriptors 1 and 2.

pub mod commands;
pub mod interactive;

use commands::CommandHandler;
use core_types::Fd;
use hal::{ConsoleDevice, KeyboardDevice};
use interactive::{KeyOutcome, LineEditor};
use kernel_api::{SyscallLayer, SyscallRequest, SyscallResponse};
use ramfs::SharedRamFs;

const COMPONENT: &str = "shell";

const HELP_TEXT: &str = "Available commands:
  help                 - Show this help message
  ls [path]            - List a directory
  mkdir <name>         - Create a directory here
  cd [path]            - Change directory (.. for parent, none for root)
  pwd                  - Show the current directory
  cat <path>           - Print a file
  touch <name>         - Create an empty file here
  write <path> <text>  - Replace a file's content
  rm <path>            - Remove an entry and its contents
  mv <path> <name>     - Rename an entry
  cp <src> <name>      - Copy a file
  find <pattern>       - Search names across the tree
  du [path]            - Show space used
  stat [path]          - Show entry details
  echo <text>          - Print text
  set <key> <value>    - Set an environment variable
  env                  - List environment variables
  log [count]          - Show recent log entries
  exit [status]        - Leave the shell";

/// Interactive shell
pub struct Shell<K, C> {
    commands: CommandHandler,
    sys: SyscallLayer<K, C>,
    editor: LineEditor,
    cwd: String,
    running: bool,
    echo: bool,
}

impl<K: KeyboardDevice, C: ConsoleDevice> Shell<K, C> {
    /// Creates a shell over `fs`, reading `keyboard` and writing `console`
    pub fn new(fs: SharedRamFs, keyboard: K, console: C) -> Self {
        Self {
            commands: CommandHandler::with_store(fs.clone()),
            sys: SyscallLayer::new(fs, keyboard, console),
            editor: LineEditor::new(),
            cwd: "/".to_string(),
            running: true,
            echo: true,
        }
    }

    /// The prompt for the current directory
    pub fn prompt(&self) -> String {
        format!("ramfs:{}> ", self.cwd)
    }

    /// Working-directory display string
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// False once `exit` has run
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Exit status requested by `exit`, if any
    pub fn exit_status(&self) -> Option<i32> {
        self.sys.exit_status()
    }

    /// The syscall layer the shell talks through
    pub fn syscalls(&self) -> &SyscallLayer<K, C> {
        &self.sys
    }

    /// The syscall layer the shell talks through, mutably
    pub fn syscalls_mut(&mut self) -> &mut SyscallLayer<K, C> {
        &mut self.sys
    }

    /// Turns echo of typed bytes on or off
    ///
    /// A host terminal that echoes on its own wants this off.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Prints the first prompt
    pub fn start(&mut self) {
        let prompt = self.prompt();
        self.print(Fd::STDOUT, &prompt);
    }

    /// Drains pending keyboard input
    ///
    /// Returns the number of bytes consumed. Stops early once the shell has
    /// exited.
    pub fn pump(&mut self) -> usize {
        let mut consumed = 0;
        while self.running {
            let byte = match self.sys.handle(SyscallRequest::Read {
                fd: Fd::STDIN,
                max_len: 1,
            }) {
                Ok(SyscallResponse::Data(data)) => match data.first() {
                    Some(byte) => *byte,
                    None => break,
                },
                _ => break,
            };
            consumed += 1;
            self.process_byte(byte);
        }
        consumed
    }

    /// Feeds one keyboard byte through the line editor
    pub fn process_byte(&mut self, byte: u8) {
        match self.editor.process_byte(byte) {
            KeyOutcome::Echo(byte) if self.echo => {
                self.print(Fd::STDOUT, &char::from(byte).to_string())
            }
            KeyOutcome::Erase if self.echo => self.print(Fd::STDOUT, "\x08 \x08"),
            KeyOutcome::Submit(line) => {
                if self.echo {
                    self.print(Fd::STDOUT, "\n");
                }
                if !line.trim().is_empty() {
                    self.run_line(&line);
                }
                if self.running {
                    let prompt = self.prompt();
                    self.print(Fd::STDOUT, &prompt);
                }
            }
            KeyOutcome::Echo(_) | KeyOutcome::Erase | KeyOutcome::Ignored => {}
        }
    }

    /// Executes one line and prints its result
    pub fn run_line(&mut self, line: &str) {
        match self.execute(line) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => self.print(Fd::STDOUT, &format!("{}\n", output)),
            Err(message) => self.print(Fd::STDERR, &format!("{}\n", message)),
        }
    }

    /// Executes one command line
    pub fn execute(&mut self, line: &str) -> Result<String, String> {
        let line = line.trim();
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };

        let result = match command {
            "help" => Ok(HELP_TEXT.to_string()),
            "ls" => self.commands.ls(args),
            "mkdir" => self.commands.mkdir(required(command, args)?),
            "cd" => self.commands.cd(args),
            "pwd" => self.commands.pwd(),
            "cat" => self.commands.cat(required(command, args)?),
            "touch" => self.commands.touch(required(command, args)?),
            "write" => {
                let (path, text) = two_args(command, args)?;
                self.commands.write(path, text)
            }
            "rm" => self.commands.rm(required(command, args)?),
            "mv" => {
                let (path, name) = two_args(command, args)?;
                self.commands.mv(path, name)
            }
            "cp" => {
                let (src, dst) = two_args(command, args)?;
                self.commands.cp(src, dst)
            }
            "find" => self.commands.find(args),
            "du" => self.commands.du(args),
            "stat" => self.commands.stat(args),
            "echo" => Ok(args.to_string()),
            "set" => self.set(args),
            "env" => Ok(self.env()),
            "log" => self.commands.log(args),
            "exit" => self.exit(args),
            other => Err(format!(
                "Unknown command: {}\nType 'help' for a list of commands.",
                other
            )),
        };

        if matches!(command, "cd" | "rm") {
            self.refresh_cwd();
        }
        result
    }

    fn set(&mut self, args: &str) -> Result<String, String> {
        let (key, value) = match args.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (args, ""),
        };
        self.sys
            .handle(SyscallRequest::SetEnv {
                key: key.to_string(),
                value: value.to_string(),
            })
            .map_err(|e| format!("set failed: {}", e))?;
        Ok(String::new())
    }

    fn env(&self) -> String {
        self.sys
            .env_vars()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn exit(&mut self, args: &str) -> Result<String, String> {
        let status = if args.is_empty() {
            0
        } else {
            args.parse::<i32>()
                .map_err(|_| format!("exit failed: not a number: {}", args))?
        };
        self.sys
            .handle(SyscallRequest::Exit { status })
            .map_err(|e| format!("exit failed: {}", e))?;
        self.running = false;
        Ok(String::new())
    }

    fn refresh_cwd(&mut self) {
        if let Ok(path) = self.commands.pwd() {
            self.cwd = path;
        }
    }

    fn print(&mut self, fd: Fd, text: &str) {
        if text.is_empty() {
            return;
        }
        let written = self.sys.handle(SyscallRequest::Write {
            fd,
            data: text.as_bytes().to_vec(),
        });
        if let Err(e) = written {
            self.sys
                .store()
                .with(|fs| fs.log_mut().warn(COMPONENT, format!("console write failed: {}", e)));
        }
    }
}

fn required<'a>(command: &str, args: &'a str) -> Result<&'a str, String> {
    if args.is_empty() {
        Err(format!("{}: missing operand", command))
    } else {
        Ok(args)
    }
}

fn two_args<'a>(command: &str, args: &'a str) -> Result<(&'a str, &'a str), String> {
    match args.split_once(char::is_whitespace) {
        Some((first, rest)) if !rest.trim().is_empty() => Ok((first, rest.trim())),
        _ => Err(format!("{}: expected two operands", command)),
    }
}
