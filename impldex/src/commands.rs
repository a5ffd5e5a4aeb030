use crate::request::Request;

mod check;
mod edit;
mod implements;
pub(crate) mod list;
mod show;

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// List documented traits with their implementor counts
    List,

    /// Show the implementors of a trait, grouped by crate
    Show {
        /// Trait path or bare name (e.g., "num_enum::TryFromPrimitive" or "TryFromPrimitive")
        name: String,
    },

    /// Show the traits a type implements
    Implements {
        /// Type name or path (e.g., "Mount" or "gw2_mumble::Mount")
        name: String,
    },

    /// Validate every implementor script
    Check {
        /// Crates allowed to appear in tables (repeatable; default allows any)
        #[arg(short, long = "crate")]
        crates: Vec<String>,

        /// Also check that linked documentation pages exist
        #[arg(short, long)]
        links: bool,
    },

    /// Re-serialize every script, repairing stale metadata
    Rewrite {
        /// Report what would change without writing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Remove a crate's implementors from every script
    RemoveCrate {
        /// Crate name as it appears in the tables
        name: String,

        /// Report what would change without writing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

impl Commands {
    pub fn list() -> Self {
        Self::List
    }

    /// Run the command, returning its output and whether it failed
    pub fn execute(self, request: &Request) -> (String, bool) {
        match self {
            Commands::List => list::execute(request),
            Commands::Show { name } => show::execute(request, &name),
            Commands::Implements { name } => implements::execute(request, &name),
            Commands::Check { crates, links } => check::execute(request, &crates, links),
            Commands::Rewrite { dry_run } => edit::rewrite(request, dry_run),
            Commands::RemoveCrate { name, dry_run } => {
                edit::remove_crate(request, &name, dry_run)
            }
        }
    }
}

#[cfg(test)]
impl Commands {
    pub fn show(name: impl std::fmt::Display) -> Self {
        Self::Show {
            name: name.to_string(),
        }
    }

    pub fn implements(name: impl std::fmt::Display) -> Self {
        Self::Implements {
            name: name.to_string(),
        }
    }

    pub fn check() -> Self {
        Self::Check {
            crates: vec![],
            links: false,
        }
    }

    pub fn rewrite() -> Self {
        Self::Rewrite { dry_run: false }
    }

    pub fn remove_crate(name: impl std::fmt::Display) -> Self {
        Self::RemoveCrate {
            name: name.to_string(),
            dry_run: false,
        }
    }

    pub fn allowing(self, crate_name: impl std::fmt::Display) -> Self {
        match self {
            Self::Check { mut crates, links } => {
                crates.push(crate_name.to_string());
                Self::Check { crates, links }
            }
            other => other,
        }
    }

    pub fn with_links(self) -> Self {
        match self {
            Self::Check { crates, .. } => Self::Check {
                crates,
                links: true,
            },
            other => other,
        }
    }

    pub fn dry_run(self) -> Self {
        match self {
            Self::Rewrite { .. } => Self::Rewrite { dry_run: true },
            Self::RemoveCrate { name, .. } => Self::RemoveCrate {
                name,
                dry_run: true,
            },
            other => other,
        }
    }
}
