use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use staffing_approval::cli::{Cli, Command};
use staffing_approval::config::ApprovalConfig;
use staffing_approval::store::{ApprovalStore, InMemoryStore, JsonFileStore};
use staffing_approval::ui::Printer;
use staffing_approval::WorkflowError;
use staffing_approval::workflow::{ApprovalCoordinator, Project};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let printer = Printer::default();

    if let Err(e) = run(cli, &printer).await {
        match e.downcast_ref::<WorkflowError>() {
            Some(workflow_err) => printer.error(workflow_err),
            None => eprintln!("error: {e:#}"),
        }
        std::process::exit(1);
    }
}

fn init_tracing(config: &ApprovalConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&config.log_filter)
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, printer: &Printer) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ApprovalConfig::load_from(path)?,
        None => ApprovalConfig::load()?,
    };
    init_tracing(&config, cli.verbose);

    let store = JsonFileStore::new(cli.store.unwrap_or_else(|| config.store_path.clone()));
    let coordinator = ApprovalCoordinator::new(store.clone(), store.clone(), &config.approver_id);

    match cli.command {
        Command::AddProject { id, name } => {
            let project = store.save_project(&Project::new(&id, &name)).await?;
            printer.project(&project);
        }
        Command::Request {
            project,
            requester,
            remarks,
        } => {
            let record = coordinator
                .request_approval(&project, &requester, remarks)
                .await?;
            printer.request(&record);
        }
        Command::Approve {
            request,
            approver,
            remarks,
        } => {
            let record = coordinator
                .approve_project(&request, &approver, remarks)
                .await?;
            printer.request(&record);
        }
        Command::Reject {
            request,
            approver,
            reason,
        } => {
            let record = coordinator
                .reject_project(&request, &approver, &reason)
                .await?;
            printer.request(&record);
        }
        Command::History { project } => {
            let records = coordinator.history_for_project(&project).await?;
            printer.history(&records);
        }
        Command::Inbox { user } => {
            printer.inbox(&store.inbox(&user).await?);
        }
        Command::Demo => demo(&config, printer).await?,
    }

    Ok(())
}

/// Request and approve a project against a throwaway in-memory store.
async fn demo(config: &ApprovalConfig, printer: &Printer) -> Result<()> {
    let store = Arc::new(InMemoryStore::with_projects([Project::new(
        "proj-1",
        "Warehouse rollout",
    )]));
    let coordinator = ApprovalCoordinator::new(store.clone(), store.clone(), &config.approver_id);

    println!("Requesting approval for proj-1 as user-1...");
    let opened = coordinator
        .request_approval("proj-1", "user-1", Some("please review".into()))
        .await?;
    printer.request(&opened);

    println!("Approving as user-2...");
    let approved = coordinator
        .approve_project(&opened.id, "user-2", Some("looks good".into()))
        .await?;
    printer.request(&approved);

    if let Some(project) = store.find_project("proj-1").await? {
        printer.project(&project);
    }

    println!("Approving again as user-3 (expected to be refused)...");
    if let Err(e) = coordinator.approve_project(&opened.id, "user-3", None).await {
        printer.error(&e);
    }

    println!("Requester inbox:");
    printer.inbox(&store.inbox("user-1"));
    Ok(())
}
