use std::path::PathBuf;

use clap::Parser;

use crate::errors::AppError;
use crate::models::job::JobTarget;

/// Command line for the `drafter` binary.
#[derive(Debug, Parser)]
#[command(
    name = "drafter",
    version,
    about = "Drafts a tailored CV and covering letter for a job opening"
)]
pub struct Cli {
    /// Job to apply for, e.g. "Platform Engineer at Acme"
    #[arg(short, long, env = "JOB_TARGET")]
    pub job: Option<String>,

    /// Candidate profile (JSON)
    #[arg(short, long, default_value = "profile.json")]
    pub profile: PathBuf,

    /// Tone notes for the covering letter; a missing file means no notes
    #[arg(short, long, default_value = "notes.md")]
    pub notes: PathBuf,

    /// Run configuration (JSON); a missing file means defaults
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Make one attempt and exit, whatever the run configuration says
    #[arg(long, conflicts_with = "daemon")]
    pub once: bool,

    /// Keep reapplying until maxAttempts is reached
    #[arg(long)]
    pub daemon: bool,

    /// Debug logging, including model request and response payloads
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The job target, required before any model call.
    pub fn job_target(&self) -> Result<JobTarget, AppError> {
        match &self.job {
            Some(job) => JobTarget::new(job.clone()),
            None => Err(AppError::Configuration(
                "No job target: pass --job or set JOB_TARGET".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply() {
        let cli = Cli::try_parse_from(["drafter", "--job", "SRE at Initech"]).unwrap();
        assert_eq!(cli.profile, PathBuf::from("profile.json"));
        assert_eq!(cli.notes, PathBuf::from("notes.md"));
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.once && !cli.daemon && !cli.debug);
        assert_eq!(cli.job_target().unwrap().as_str(), "SRE at Initech");
    }

    #[test]
    fn once_conflicts_with_daemon() {
        assert!(Cli::try_parse_from(["drafter", "--once", "--daemon"]).is_err());
    }

    #[test]
    fn blank_job_is_configuration_error() {
        let cli = Cli::try_parse_from(["drafter", "--job", "   "]).unwrap();
        assert!(matches!(cli.job_target(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn explicit_paths_parse() {
        let cli = Cli::try_parse_from([
            "drafter",
            "-j",
            "Data Engineer",
            "--profile",
            "/tmp/me.json",
            "--config",
            "/tmp/run.json",
            "--once",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.profile, PathBuf::from("/tmp/me.json"));
        assert_eq!(cli.config, PathBuf::from("/tmp/run.json"));
        assert!(cli.once && cli.debug);
    }
}
