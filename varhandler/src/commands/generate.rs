use std::{ffi::OsString, path::PathBuf};

use clap::Args;
use eyre::Result;
use varhandler_codegen::{GenerateConfig, SourceSet};
use varhandler_core::is_directory;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Comma-separated list of functions to generate handlers for
    #[arg(short, long = "func", value_delimiter = ',', required = true)]
    pub functions: Vec<String>,

    /// Output file (defaults to <dir>/generated_varhandlers.rs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the generated code instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// A module directory, or a list of files of one module
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let config = self.config(invocation(std::env::args_os().skip(1)));

        let report = ops::generate(&config).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());
        Ok(())
    }

    /// Build the run configuration; `invocation` is echoed in the banner.
    pub fn config(&self, invocation: String) -> GenerateConfig {
        let sources = match self.paths.as_slice() {
            [dir] if is_directory(dir) => SourceSet::Directory(dir.clone()),
            files => SourceSet::Files(files.to_vec()),
        };

        let mut config = GenerateConfig::new(&self.functions, sources)
            .invocation(invocation)
            .dry_run(self.dry_run);
        if let Some(output) = &self.output {
            config = config.output(output);
        }
        config
    }
}

/// Command line echoed in the banner; arguments that are not UTF-8 are shown lossily.
fn invocation(args: impl IntoIterator<Item = OsString>) -> String {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::commands::Cli;

    fn parse(args: &[&str]) -> GenerateCommand {
        Cli::try_parse_from(args).unwrap().generate
    }

    #[test]
    fn test_functions_split_on_commas() {
        let cmd = parse(&["varhandler", "-f", "GetUser,CreateUser", "--func", "Ping"]);
        assert_eq!(cmd.functions, vec!["GetUser", "CreateUser", "Ping"]);
        assert_eq!(cmd.paths, vec![PathBuf::from(".")]);
        assert!(!cmd.dry_run);
    }

    #[test]
    fn test_func_is_required() {
        assert!(Cli::try_parse_from(["varhandler", "src/api"]).is_err());
    }

    #[test]
    fn test_single_directory_selects_directory_mode() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();
        let cmd = parse(&["varhandler", "-f", "F", dir]);

        let config = cmd.config("-f F".into());
        assert_eq!(config.sources, SourceSet::Directory(temp.path().to_path_buf()));
        assert_eq!(config.invocation, "-f F");
        assert_eq!(config.functions, vec!["F"]);
    }

    #[test]
    fn test_files_mode_and_output() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.rs");
        let b = temp.path().join("b.rs");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let cmd = parse(&[
            "varhandler",
            "-f",
            "F",
            "-o",
            "out.rs",
            "--dry-run",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
        ]);
        let config = cmd.config(String::new());

        assert_eq!(config.sources, SourceSet::Files(vec![a, b]));
        assert_eq!(config.output_path(), PathBuf::from("out.rs"));
        assert!(config.dry_run);
    }

    #[test]
    fn test_invocation_joins_arguments() {
        let args = ["-f", "A,B", "./api"].map(OsString::from);
        assert_eq!(invocation(args), "-f A,B ./api");
    }

    #[cfg(unix)]
    #[test]
    fn test_invocation_survives_non_utf8_arguments() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("-f"),
            OsString::from("A"),
            OsString::from_vec(b"caf\xff".to_vec()),
        ];
        assert_eq!(invocation(args), "-f A caf\u{fffd}");
    }
}
