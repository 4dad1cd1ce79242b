//! Command-line surface.
//!
//! One optional flag: `--resume` alone resumes the latest saved run,
//! `--resume <run_id>` resumes a specific one.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeSelection {
    Latest,
    Id(String),
}

/// Parses the resume flag out of the argument list.
#[must_use]
pub fn parse_resume_selection(args: &[String]) -> Option<ResumeSelection> {
    let index = args.iter().position(|arg| arg == "--resume")?;
    match args.get(index + 1) {
        Some(next) if !next.starts_with('-') => Some(ResumeSelection::Id(next.clone())),
        _ => Some(ResumeSelection::Latest),
    }
}
