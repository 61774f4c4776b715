use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use complaints_core::client::view::{render_detail, render_form, render_list};
use complaints_core::client::{
    Action, ComplaintForm, ComplaintsApiClient, ImageAttachment, ListState, SortKey,
};
use complaints_core::features::complaints::models::Department;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "complaints-cli")]
#[command(about = "Browse and file civic complaints", long_about = None)]
struct Cli {
    /// Base URL of the complaints API
    #[arg(long, default_value = "http://localhost:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List complaints with optional filters
    List {
        #[arg(long)]
        approved: Option<bool>,
        #[arg(long)]
        status: Option<String>,
        /// Electrical, Water, Municipal or Garbage
        #[arg(long)]
        department: Option<Department>,
        /// date_desc, date_asc, upvotes_desc or status
        #[arg(long, default_value = "date_desc")]
        sort: SortKey,
    },
    /// Show one complaint in full
    Show { id: Uuid },
    /// File a new complaint
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        department: Department,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Image file to attach; repeat for several
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        /// Local URL of a recorded audio note
        #[arg(long)]
        audio_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = ComplaintsApiClient::new(cli.api_url);

    match cli.command {
        Commands::List {
            approved,
            status,
            department,
            sort,
        } => list(&client, approved, status, department, sort).await,
        Commands::Show { id } => show(&client, id).await,
        Commands::Submit {
            title,
            description,
            department,
            lat,
            lon,
            images,
            audio_url,
        } => {
            let mut form = ComplaintForm {
                title,
                description,
                department: Some(department),
                audio_note: audio_url,
                ..Default::default()
            };
            if let (Some(lat), Some(lon)) = (lat, lon) {
                form.capture_location(lat, lon)?;
            }
            for path in images {
                let image = ImageAttachment::from_path(&path)
                    .await
                    .with_context(|| format!("Failed to read image {}", path.display()))?;
                form.attach_image(image);
            }
            submit(&client, form).await
        }
    }
}

async fn load(client: &ComplaintsApiClient) -> Result<ListState> {
    let complaints = client
        .list()
        .await
        .with_context(|| format!("Failed to load complaints from {}", client.base_url()))?;
    Ok(ListState::new().reduce(Action::Loaded(complaints)))
}

async fn list(
    client: &ComplaintsApiClient,
    approved: Option<bool>,
    status: Option<String>,
    department: Option<Department>,
    sort: SortKey,
) -> Result<()> {
    let mut state = load(client).await?;
    if let Some(approved) = approved {
        state = state.reduce(Action::ToggleApproved(approved));
    }
    if let Some(status) = status {
        state = state.reduce(Action::ToggleStatus(status));
    }
    state = state
        .reduce(Action::SetDepartment(department))
        .reduce(Action::SetSort(sort));

    println!("{}", render_list(&state.visible()));
    Ok(())
}

async fn show(client: &ComplaintsApiClient, id: Uuid) -> Result<()> {
    let state = load(client).await?.reduce(Action::OpenDetail(id));
    let complaint = state
        .selected()
        .with_context(|| format!("Complaint {} not found", id))?;

    println!("{}", render_detail(complaint, state.tasklist(id)));
    Ok(())
}

async fn submit(client: &ComplaintsApiClient, form: ComplaintForm) -> Result<()> {
    let state = ListState::new()
        .reduce(Action::OpenRegister)
        .reduce(Action::UpdateForm(form));
    println!("{}\n", render_form(state.form()));

    let submission = state.form().to_submission(Utc::now())?;
    let created = client.create(&submission).await?;
    let id = created.id;

    let state = state
        .reduce(Action::Submitted(created))
        .reduce(Action::OpenDetail(id));
    if let Some(complaint) = state.selected() {
        println!("{}", render_detail(complaint, state.tasklist(id)));
    }
    Ok(())
}
