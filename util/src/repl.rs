use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

pub trait Repl {
    type Error: std::fmt::Debug;
    const HISTORY: Option<&'static str> = None;
    const PROMPT: &'static str = ">> ";
    /// Shown while a line ending in `\` is being continued.
    const CONTINUATION_PROMPT: &'static str = ".. ";
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        editor.load_history(history).ok();
    }
    let mut pending: Option<String> = None;
    loop {
        let prompt = if pending.is_some() {
            R::CONTINUATION_PROMPT
        } else {
            R::PROMPT
        };
        match editor.readline(prompt) {
            Ok(line) if pending.is_none() && is_comment(&line) => continue,
            Ok(mut line) if line.ends_with('\\') => {
                line.pop();
                line.push('\n');
                pending.get_or_insert_with(String::new).push_str(&line);
            }
            Ok(line) => {
                let input = match pending.take() {
                    Some(mut input) => {
                        input.push_str(&line);
                        input
                    }
                    None => line,
                };
                if input.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(input.as_str());
                repl.evaluate(input).map_err(Error::EvalError)?;
                if let Some(history) = R::HISTORY {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
            }
            Err(ReadlineError::Interrupted) if pending.is_some() => {
                pending = None;
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
