//! About screen.

use anyhow::Result;
use console::Term;

use crate::ui;

pub fn run() -> Result<()> {
    let term = Term::stdout();
    ui::banner(&term, &format!("Code Tutor v{}", env!("CARGO_PKG_VERSION")))?;
    term.write_line("An intelligent, respectful code review and tutoring CLI tool.")?;
    term.write_line("")?;
    ui::section(&term, "Features")?;
    term.write_line("  • Personalized feedback based on your experience level")?;
    term.write_line("  • Interactive dialogue about your code decisions")?;
    term.write_line("  • Mathematical proof review, from prose to Lean and Coq")?;
    term.write_line("  • Practice exercises with progressive hints")?;
    term.write_line("  • Teaching mode: explain flawed code to a struggling student")?;
    term.write_line("")?;
    ui::section(&term, "Commands")?;
    term.write_line("  setup     - Configure your API key and preferences")?;
    term.write_line("  review    - Review a file or directory")?;
    term.write_line("  proof     - Review a mathematical proof")?;
    term.write_line("  exercise  - Generate and work through practice exercises")?;
    term.write_line("  teach     - Teach a struggling student (roles reversed)")?;
    term.write_line("  config    - View configuration")?;
    term.write_line("  logs      - Export or clear session logs")?;
    Ok(())
}
