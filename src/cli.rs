//! Command-line interface built on clap.
//!
//! Defines [`Cli`] with the workflow subcommands in [`Command`] and the
//! global flags (--store, --config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Project approval workflow for the staffing platform.
#[derive(Debug, Parser)]
#[command(name = "staffing-approval", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON store file; overrides `store_path` from the config file.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Configuration file to load.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a project so approvals can be requested for it.
    AddProject {
        /// Project id.
        id: String,
        /// Display name.
        name: String,
    },

    /// Open an approval request for a project.
    Request {
        /// Project id.
        project: String,

        #[arg(long)]
        requester: String,

        #[arg(long)]
        remarks: Option<String>,
    },

    /// Approve a pending request.
    Approve {
        /// Request history id.
        request: String,

        #[arg(long)]
        approver: String,

        /// Replaces the request remarks when given.
        #[arg(long)]
        remarks: Option<String>,
    },

    /// Reject a pending request.
    Reject {
        /// Request history id.
        request: String,

        #[arg(long)]
        approver: String,

        #[arg(long)]
        reason: String,
    },

    /// List every approval cycle of a project, newest first.
    History {
        /// Project id.
        project: String,
    },

    /// Show notifications addressed to a user.
    Inbox {
        /// User id.
        user: String,
    },

    /// Run a request/approve walkthrough against an in-memory store.
    Demo,
}
