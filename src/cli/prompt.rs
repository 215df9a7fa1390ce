use std::io::{self, BufRead, Write};

use super::params::{Field, RawParameters};

/// Line-based prompting over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed line. End of input reads as an empty line.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Prompts for every field not already present in `raw`.
    pub fn collect(&mut self, mut raw: RawParameters) -> io::Result<RawParameters> {
        for field in Field::ALL {
            let slot = raw.get_mut(field);
            if slot.is_empty() {
                *slot = self.ask(&field.prompt())?;
            }
        }
        Ok(raw)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ask_trims_input_and_echoes_prompt() {
        let mut prompter = Prompter::new(Cursor::new("  42 \n"), Vec::new());
        let answer = prompter.ask("Age: ").expect("read");

        assert_eq!(answer, "42");
        assert_eq!(prompter.into_output(), b"Age: ");
    }

    #[test]
    fn end_of_input_reads_as_empty() {
        let mut prompter = Prompter::new(Cursor::new(""), Vec::new());
        assert_eq!(prompter.ask("Age: ").expect("read"), "");
    }

    #[test]
    fn collect_skips_fields_already_given() {
        let raw = RawParameters {
            current_age: "40".to_string(),
            ..RawParameters::default()
        };
        let mut prompter = Prompter::new(Cursor::new("150000\n\n\n\n\n90\n"), Vec::new());
        let raw = prompter.collect(raw).expect("read");

        assert_eq!(raw.current_age, "40");
        assert_eq!(raw.initial_capital, "150000");
        assert_eq!(raw.monthly_inflation, "");
        assert_eq!(raw.life_expectancy, "90");

        let output = String::from_utf8(prompter.into_output()).expect("utf8");
        assert!(!output.contains("Current age"));
        assert_eq!(output.matches("[default: ").count(), 6);
    }
}
