//! OneTask marketplace CLI
//!
//! Thin command surface over the client library: sessions persist in a
//! file store between invocations, so `login` once and every later
//! command picks the session up from disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onetask_client::{
    ApiClient, AssignmentOutcome, Config, FileSessionStore, ProfileService, ProposalWorkflow,
    SessionManager,
};
use onetask_core::{
    ProfileUpdate, Registration, TaskCreation, TaskId, TaskStatus, TaskType, UserId,
};

#[derive(Parser)]
#[command(name = "onetask", about = "OneTask freelance marketplace client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the persisted session
    Logout,
    /// Show the current session
    Whoami,
    /// Register a new account and log in
    Register {
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Browse the public task board
    Board {
        /// Newest tasks first
        #[arg(long)]
        newest: bool,
    },
    /// Show one task
    Task { id: i32 },
    /// Post a new task
    PostTask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        problem: String,
        /// RFC 3339 timestamp, e.g. 2026-09-01T12:00:00Z
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        payment: f64,
        /// Task category, e.g. ProgrammingAndDevelopment
        #[arg(long = "type")]
        task_type: String,
    },
    /// Tasks you posted
    Posted,
    /// Tasks assigned to you
    Taken {
        /// Filter by status, e.g. ASSIGNED
        #[arg(long)]
        status: Option<String>,
    },
    /// Send a proposal for a task
    Propose { task_id: i32 },
    /// Proposals received on your posted tasks
    Received,
    /// Assign a freelancer to one of your tasks
    Assign { task_id: i32, freelancer_id: i32 },
    /// Show your profile
    Profile,
    /// Update profile fields
    EditProfile {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onetask_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");

    let api = ApiClient::new(&config)?;
    let store = FileSessionStore::new(&config.session_file);
    let manager = SessionManager::new(api.clone(), store);

    match cli.command {
        Command::Login { username, password } => {
            let session = manager.login(&username, &password).await?;
            println!("Logged in as {} <{}>", session.username, session.email);
        }
        Command::Logout => {
            manager.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match manager.current_session() {
            Some(session) => println!(
                "{} <{}> (user id {}, session expires {})",
                session.username, session.email, session.user_id, session.expires_at
            ),
            None => println!("Not logged in"),
        },
        Command::Register {
            username,
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            let registration = Registration {
                username,
                first_name,
                last_name,
                email,
                password,
            };
            let session = manager.register(registration, &confirm_password).await?;
            println!("Registered and logged in as {}", session.username);
        }
        Command::Board { newest } => {
            for task in api.task_board(newest).await? {
                println!(
                    "#{} {} [{}] budget {} due {}",
                    task.id,
                    task.title,
                    task.status.as_str(),
                    task.payment,
                    task.deadline.date_naive()
                );
            }
        }
        Command::Task { id } => {
            let task = api.task(TaskId(id)).await?;
            println!("#{} {}", task.id, task.title);
            println!("Type: {:?}", task.task_type);
            println!("Status: {}", task.status.as_str());
            println!("Budget: {}", task.payment);
            println!("Deadline: {}", task.deadline);
            if let Some(customer) = task.customer_username.as_deref() {
                println!("Posted by: {customer}");
            }
            println!("{}", task.problem);
        }
        Command::PostTask {
            title,
            problem,
            deadline,
            payment,
            task_type,
        } => {
            let session = manager.require_session()?;
            let creation = TaskCreation {
                customer_id: Some(session.user_id),
                title,
                problem,
                deadline: deadline.parse()?,
                task_status: TaskStatus::Unassigned,
                payment,
                task_type: task_type.parse::<TaskType>()?,
            };
            api.create_task(&session.auth_token, &creation).await?;
            println!("Task posted");
        }
        Command::Posted => {
            let session = manager.require_session()?;
            for task in api.posted_tasks(&session.auth_token, false).await? {
                println!("#{} {} [{}]", task.id, task.title, task.status.as_str());
            }
        }
        Command::Taken { status } => {
            let session = manager.require_session()?;
            let status = status.map(|s| s.parse::<TaskStatus>()).transpose()?;
            for task in api.taken_tasks(&session.auth_token, status, false).await? {
                println!(
                    "#{} {} [{}] due {}",
                    task.id,
                    task.title,
                    task.status.as_str(),
                    task.deadline.date_naive()
                );
            }
        }
        Command::Propose { task_id } => {
            let session = manager.require_session()?;
            let mut workflow = ProposalWorkflow::new(api.clone(), session);
            workflow.load_sent_proposals().await?;
            let proposal = workflow.send_proposal(TaskId(task_id)).await?;
            match proposal.id {
                Some(id) => println!("Proposal {id} sent for task {task_id}"),
                None => println!("Proposal sent for task {task_id}"),
            }
        }
        Command::Received => {
            let session = manager.require_session()?;
            let workflow = ProposalWorkflow::new(api.clone(), session);
            let grouped = workflow.received_proposals().await?;
            if grouped.is_empty() {
                println!("No proposals received");
            }
            for (task_id, proposals) in grouped {
                let title = proposals
                    .first()
                    .map(|p| p.task_title.as_str())
                    .unwrap_or_default();
                println!("Task #{task_id} \"{title}\":");
                for proposal in proposals {
                    println!(
                        "  {} (freelancer id {})",
                        proposal.freelancer_username, proposal.freelancer_id
                    );
                }
            }
        }
        Command::Assign {
            task_id,
            freelancer_id,
        } => {
            let session = manager.require_session()?;
            let mut workflow = ProposalWorkflow::new(api.clone(), session);
            workflow.select_freelancer(TaskId(task_id), UserId(freelancer_id));
            match workflow.confirm_assignment(TaskId(task_id)).await {
                AssignmentOutcome::Committed => {
                    println!("Freelancer {freelancer_id} assigned to task {task_id}");
                }
                AssignmentOutcome::Rejected { reason } => {
                    println!("Assignment rejected: {reason}");
                }
            }
        }
        Command::Profile => {
            let session = manager.require_session()?;
            let profile = ProfileService::new(api.clone()).current(&session).await?;
            println!("{} ({})", profile.username, profile.id);
            println!("{} {} <{}>", profile.first_name, profile.last_name, profile.email);
            if let Some(rating) = profile.rating {
                println!("Rating: {rating}");
            }
        }
        Command::EditProfile {
            first_name,
            last_name,
            email,
        } => {
            let session = manager.require_session()?;
            let profiles = ProfileService::new(api.clone());
            let current = profiles.load_for_edit(&session).await?;
            let update = ProfileUpdate {
                id: current.id,
                first_name,
                last_name,
                email,
            };
            profiles.save(&session, &update).await?;
            println!("Profile updated");
        }
    }

    Ok(())
}
