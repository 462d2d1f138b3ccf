pub mod build;
pub mod parsers;
pub mod validate;

use clap::{Parser, Subcommand};

/// compendium - Merge open TTRPG sources into a campaign compendium
#[derive(Parser, Debug)]
#[command(name = "compendium")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every source and write the compendium file
    Build(build::BuildArgs),

    /// Check compendium.yaml without fetching anything
    Validate(validate::ValidateArgs),

    /// List the available source parsers
    Parsers(parsers::ParsersArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::try_parse_from(["compendium", "build"]).unwrap();

        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.manifest, std::path::PathBuf::from("compendium.yaml"));
                assert!(args.output.is_none());
                assert!(!args.overwrite);
            }
            other => panic!("expected build, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "compendium",
            "build",
            "--manifest",
            "osr/compendium.yaml",
            "-o",
            "out.json",
            "--overwrite",
        ])
        .unwrap();

        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.manifest, std::path::PathBuf::from("osr/compendium.yaml"));
        assert_eq!(args.output, Some(std::path::PathBuf::from("out.json")));
        assert!(args.overwrite);
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["compendium", "render"]).is_err());
    }
}
