use clap::{Parser, Subcommand};
use std::path::PathBuf;
use cortex_explore::models::{SortDirection, SortKey, SortSpec};

#[derive(Parser)]
#[command(name = "cortex")]
#[command(about = "Browse, search and inspect the CORTEX processed document collection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read the collection from a local JSON file instead of HTTP
    #[arg(long, global = true, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Collection URL (overrides CORTEX_DATA_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive explorer (default)
    Tui,

    /// Print the filtered and sorted document listing
    List {
        /// Case-insensitive search over title, authors and tags
        #[arg(short, long)]
        query: Option<String>,

        /// Sort column (title, author, created, added)
        #[arg(short, long, default_value = "added")]
        sort: String,

        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,

        /// Sort descending (default)
        #[arg(long)]
        desc: bool,
    },

    /// Print the detail view of one document
    Show {
        /// Document id
        id: String,

        /// Include the full analysis text
        #[arg(short, long)]
        analysis: bool,
    },
}

impl Commands {
    pub fn parse_sort_key(key: &str) -> Result<SortKey, anyhow::Error> {
        match key.to_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "author" | "authors" => Ok(SortKey::PrimaryAuthor),
            "created" | "created_date" | "createddate" => Ok(SortKey::CreatedDate),
            "added" | "added_date" | "addeddate" => Ok(SortKey::AddedDate),
            other => Err(anyhow::anyhow!(
                "Unsupported sort column: {}. Supported columns: title, author, created, added",
                other
            )),
        }
    }

    /// `--asc` and `--desc` conflict; with neither the listing is descending
    pub fn sort_spec(key: &str, asc: bool, desc: bool) -> Result<SortSpec, anyhow::Error> {
        let direction = match (asc, desc) {
            (true, false) => SortDirection::Ascending,
            (false, true) => SortDirection::Descending,
            (false, false) => SortSpec::default().direction,
            (true, true) => return Err(anyhow::anyhow!("--asc and --desc cannot be combined")),
        };
        Ok(SortSpec::new(Self::parse_sort_key(key)?, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_names() {
        assert_eq!(Commands::parse_sort_key("Title").unwrap(), SortKey::Title);
        assert_eq!(Commands::parse_sort_key("authors").unwrap(), SortKey::PrimaryAuthor);
        assert_eq!(Commands::parse_sort_key("createdDate").unwrap(), SortKey::CreatedDate);
        assert!(Commands::parse_sort_key("size").is_err());
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::parse_from(["cortex", "--file", "docs.json", "list", "-q", "acme", "--sort", "title", "--asc"]);
        assert_eq!(cli.file, Some(PathBuf::from("docs.json")));
        match cli.command {
            Some(Commands::List { query, sort, asc, desc }) => {
                assert_eq!(query.as_deref(), Some("acme"));
                let spec = Commands::sort_spec(&sort, asc, desc).unwrap();
                assert_eq!(spec, SortSpec::new(SortKey::Title, SortDirection::Ascending));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_sort_direction_flags() {
        let cli = Cli::parse_from(["cortex", "list", "--sort", "created", "--desc"]);
        match cli.command {
            Some(Commands::List { sort, asc, desc, .. }) => {
                assert!(desc);
                let spec = Commands::sort_spec(&sort, asc, desc).unwrap();
                assert_eq!(spec, SortSpec::new(SortKey::CreatedDate, SortDirection::Descending));
            }
            _ => panic!("expected list command"),
        }

        let spec = Commands::sort_spec("title", false, false).unwrap();
        assert_eq!(spec.direction, SortDirection::Descending);
        assert!(Commands::sort_spec("title", true, true).is_err());
        assert!(Cli::try_parse_from(["cortex", "list", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn test_no_command_means_tui() {
        let cli = Cli::parse_from(["cortex"]);
        assert!(cli.command.is_none());
    }
}
