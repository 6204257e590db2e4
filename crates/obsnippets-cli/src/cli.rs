use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "obsnippets - reusable text and code snippets for your notes",
    long_about = "obsnippets keeps a small library of text and code snippets and inserts them into a note at the caret."
)]
pub struct Obsnippets {
    #[clap(long, global = true, value_name = "PATH", help = "Snippet store to use instead of the default")]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a snippet
    Create,
    /// Insert in note and manage snippets
    Manage {
        #[command(flatten)]
        target: InsertTarget,
    },
}

/// Where the manager inserts the chosen snippet.
#[derive(Args, Debug, Default, Clone)]
pub struct InsertTarget {
    #[clap(long, value_name = "PATH", help = "Note to insert into")]
    pub document: Option<PathBuf>,

    #[clap(
        long,
        requires = "document",
        help = "Caret line in the note, counted from 0 [default: 0]"
    )]
    pub line: Option<usize>,

    #[clap(
        long,
        requires = "document",
        help = "Caret column in the note, counted from 0 [default: 0]"
    )]
    pub column: Option<usize>,

    #[clap(
        long,
        conflicts_with_all = ["document", "type_text"],
        help = "Copy the snippet to the clipboard"
    )]
    pub clipboard: bool,

    #[clap(
        long = "type",
        conflicts_with = "document",
        help = "Type the snippet into the focused window once the manager has closed"
    )]
    pub type_text: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let args = Obsnippets::try_parse_from(["obsnippets"]).unwrap();
        assert!(args.commands.is_none());
        assert!(args.db.is_none());
    }

    #[test]
    fn manage_takes_a_document_caret() {
        let args = Obsnippets::try_parse_from([
            "obsnippets",
            "manage",
            "--document",
            "note.md",
            "--line",
            "3",
            "--column",
            "2",
            "--db",
            "store.json",
        ])
        .unwrap();

        assert_eq!(args.db, Some(PathBuf::from("store.json")));
        match args.commands {
            Some(Commands::Manage { target }) => {
                assert_eq!(target.document, Some(PathBuf::from("note.md")));
                assert_eq!((target.line, target.column), (Some(3), Some(2)));
                assert!(!target.clipboard);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn caret_needs_a_document() {
        for flag in ["--line", "--column"] {
            let result = Obsnippets::try_parse_from(["obsnippets", "manage", flag, "4"]);
            assert!(result.is_err(), "{} accepted without --document", flag);
        }
    }

    #[test]
    fn insertion_targets_are_exclusive() {
        let result = Obsnippets::try_parse_from([
            "obsnippets",
            "manage",
            "--clipboard",
            "--document",
            "note.md",
        ]);
        assert!(result.is_err());
    }
}
