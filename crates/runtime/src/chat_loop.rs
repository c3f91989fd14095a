//! Interactive read-eval-print loop over a session.

use std::io::{BufRead, Write};

use tracing::error;

use crate::model::Backend;
use crate::tools::ToolHost;
use crate::{Result, Session};

impl<B: Backend, H: ToolHost> Session<B, H> {
    /// Run queries read from `input` until the exit keyword or EOF, then
    /// end the session.
    ///
    /// A failing query is logged and reported; the loop keeps going. The
    /// tool host is shut down exactly once, whatever the loop returns.
    pub async fn interactive_loop<R, W>(mut self, input: R, output: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let outcome = self.read_eval_print(input, output).await;
        let closed = self.end().await;
        outcome.and(closed)
    }

    async fn read_eval_print<R, W>(&mut self, mut input: R, mut output: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let keyword = self.config().exit_keyword.clone();
        writeln!(output, "Type your queries or '{keyword}' to exit.")?;

        let mut buf = Vec::new();
        loop {
            write!(output, "\nQuery: ")?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                // EOF
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    error!(error = %e, "input is not valid UTF-8");
                    writeln!(output, "\nError: input is not valid UTF-8")?;
                    continue;
                }
            };
            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if query.to_lowercase() == keyword.to_lowercase() {
                break;
            }

            match self.run_query(query).await {
                Ok(answer) => writeln!(output, "\n{answer}")?,
                Err(e) => {
                    error!(error = %e, "query failed");
                    writeln!(output, "\nError: {e}")?;
                }
            }
        }

        Ok(())
    }
}
