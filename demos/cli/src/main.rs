use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use directory_core::{
    suggest, ChoiceSource, ConsultationType, DirectoryConfig, DoctorRecord, FilterState,
    RngChoice, SortKey,
};
use directory_source::{load_doctors_str, DoctorClient};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "directory-cli",
    about = "Lọc và sắp xếp danh bạ bác sĩ từ file JSON hoặc endpoint."
)]
struct Args {
    /// Đường dẫn tới file JSON danh sách bác sĩ; bỏ trống thì tải từ endpoint.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Endpoint trả về danh sách bác sĩ.
    #[arg(long)]
    endpoint: Option<String>,

    /// Thời gian chờ tối đa cho request tải danh sách, tính bằng giây.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Query string khởi tạo bộ lọc, ví dụ `search=dr&sort=fees`.
    #[arg(short, long)]
    query: Option<String>,

    /// Từ khóa tìm theo tên.
    #[arg(short, long)]
    search: Option<String>,

    /// Hình thức khám: video hoặc clinic.
    #[arg(short, long)]
    consultation: Option<ConsultationType>,

    /// Bật/tắt một chuyên khoa; có thể lặp lại.
    #[arg(long = "specialty")]
    specialties: Vec<String>,

    /// Sắp xếp: fees hoặc experience.
    #[arg(long)]
    sort: Option<SortKey>,

    /// In tối đa 3 gợi ý tên cho từ khóa này.
    #[arg(long)]
    suggest: Option<String>,

    /// Seed cho dữ liệu giữ chỗ ngẫu nhiên, giúp kết quả lặp lại được.
    #[arg(long)]
    seed: Option<u64>,

    /// In kết quả dạng JSON.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn filters(&self) -> FilterState {
        let mut state = self
            .query
            .as_deref()
            .map(FilterState::from_query)
            .unwrap_or_default();

        if let Some(term) = &self.search {
            state.set_search(term.clone());
        }
        if let Some(kind) = self.consultation {
            state.consultation = Some(kind);
        }
        for specialty in &self.specialties {
            state.toggle_specialty(specialty);
        }
        if let Some(key) = self.sort {
            state.sort = Some(key);
        }
        state
    }

    fn config(&self) -> DirectoryConfig {
        let mut config = DirectoryConfig::default();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("directory=info")),
        )
        .init();

    let args = Args::parse();
    let mut choices: Box<dyn ChoiceSource> = match args.seed {
        Some(seed) => Box::new(RngChoice(StdRng::seed_from_u64(seed))),
        None => Box::new(RngChoice::thread()),
    };

    let records = match &args.input {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file {:?}", path))?;
            load_doctors_str(&data, choices.as_mut())?
        }
        None => {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(args.timeout_secs))
                .build()
                .context("Không khởi tạo được HTTP client")?;
            let client = DoctorClient::with_client(&args.config(), http);
            client
                .fetch_doctors(choices.as_mut())
                .await
                .with_context(|| format!("Không tải được từ {}", client.endpoint()))?
        }
    };
    tracing::info!(count = records.len(), "loaded doctors");

    let filters = args.filters();
    let matched = filters.apply(&records);
    let query = filters.to_query();

    if args.json {
        let suggestions = args
            .suggest
            .as_deref()
            .map(|term| suggest(&records, term))
            .unwrap_or_default();
        let output = serde_json::json!({
            "query": query,
            "filters": filters,
            "count": matched.len(),
            "doctors": matched,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(term) = &args.suggest {
        let names: Vec<&str> = suggest(&records, term)
            .into_iter()
            .map(|doctor| doctor.name.as_str())
            .collect();
        println!("Suggestions: {}", names.join(", "));
    }

    println!("Query: ?{query}");
    println!("{} doctor(s) found", matched.len());
    for doctor in matched {
        println!("{}", summary_line(doctor));
    }

    Ok(())
}

fn summary_line(doctor: &DoctorRecord) -> String {
    let types: Vec<&str> = doctor
        .consultation_types
        .iter()
        .flatten()
        .map(|kind| kind.as_str())
        .collect();
    format!(
        "- {} | {} | {} yrs | ₹{} | {} | {}",
        doctor.name,
        doctor.specialties.join(", "),
        doctor.experience_years,
        doctor.fees,
        doctor.city,
        types.join("+"),
    )
}
