//! Arguments shared by the cythonic command line tools

use clap::{value_parser, ArgAction, Args};

/// Common way to set logging levels.
///
/// Each `-v` raises the level and each `-q` lowers it, starting from warnings.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LoggingArgs {
    /// Log more, `-vv` for everything
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="quiet")]
    verbose: u8,
    /// Log less, `-qq` for nothing
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// How far the level was moved from the default, between `-2` and `2`
    pub fn offset(&self) -> i8 {
        (self.verbose.min(2) as i8) - (self.quiet.min(2) as i8)
    }

    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used
    #[cfg(feature = "tracing")]
    pub fn log_level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self.offset() {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            2..=i8::MAX => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use test_log::test;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        logging: LoggingArgs,
    }

    fn offset(args: &[&str]) -> i8 {
        Cli::try_parse_from(std::iter::once("cli").chain(args.iter().copied()))
            .expect("could not parse args")
            .logging
            .offset()
    }

    #[test]
    fn test_counts_flags() {
        assert_eq!(offset(&[]), 0);
        assert_eq!(offset(&["-v"]), 1);
        assert_eq!(offset(&["-vv"]), 2);
        assert_eq!(offset(&["-qq"]), -2);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["cli", "-v", "-q"]).is_err());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_level_filter() {
        use tracing::level_filters::LevelFilter;
        assert_eq!(LoggingArgs::default().log_level_filter(), LevelFilter::WARN);
    }
}
