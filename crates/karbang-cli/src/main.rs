use std::path::PathBuf;

use clap::{Parser, Subcommand};

use karbang_scraper::{
    export_csv, provinces, search, CancelFlag, ClientConfig, DirectoryClient, PageProgress,
    RegionResolver, SearchFilter,
};

#[derive(Debug, Parser)]
#[command(name = "karbang-cli")]
#[command(about = "karhanbang.com brokerage-office directory scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List provinces, or the districts / sub-districts below one
    Regions {
        /// Province (시도) to list districts for
        #[arg(long)]
        province: Option<String>,
        /// District (시군구) to list sub-districts for; requires --province
        #[arg(long, requires = "province")]
        district: Option<String>,
    },
    /// Scrape listings for a region and export them to CSV
    Scrape {
        /// Province (시도) to search, e.g. 서울특별시
        #[arg(long)]
        province: String,
        /// District (시군구); omit for a province-wide search
        #[arg(long)]
        district: Option<String>,
        /// Sub-district (읍면동); requires --district
        #[arg(long, requires = "district")]
        sub_district: Option<String>,
        /// Output filename; defaults to a timestamped name
        #[arg(long)]
        out: Option<String>,
        /// Output directory; defaults to ~/Documents/부동산_크롤링
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = DirectoryClient::new(&ClientConfig::default())?;
    let mut resolver = RegionResolver::new();

    match cli.command {
        Commands::Regions { province, district } => {
            run_regions(&client, &mut resolver, province, district).await;
        }
        Commands::Scrape {
            province,
            district,
            sub_district,
            out,
            dir,
        } => {
            let filter = SearchFilter {
                province,
                district,
                sub_district,
            };
            run_scrape(&client, &mut resolver, &filter, out.as_deref(), dir.as_deref()).await?;
        }
    }

    Ok(())
}

async fn run_regions(
    client: &DirectoryClient,
    resolver: &mut RegionResolver,
    province: Option<String>,
    district: Option<String>,
) {
    match (province, district) {
        (None, _) => {
            for p in provinces() {
                println!("{}", p.name);
            }
        }
        (Some(province), None) => {
            // A failed lookup degrades to an empty list plus a message.
            match resolver.districts(client, &province).await {
                Ok(names) => names.iter().for_each(|n| println!("{n}")),
                Err(e) => tracing::warn!(error = %e, "no districts"),
            }
        }
        (Some(province), Some(district)) => {
            match resolver.sub_districts(client, &province, &district).await {
                Ok(names) => names.iter().for_each(|n| println!("{n}")),
                Err(e) => tracing::warn!(error = %e, "no sub-districts"),
            }
        }
    }
}

async fn run_scrape(
    client: &DirectoryClient,
    resolver: &mut RegionResolver,
    filter: &SearchFilter,
    out: Option<&str>,
    dir: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let progress = |p: PageProgress| {
        if p.current_page == 0 {
            tracing::info!(total_pages = p.total_pages, "page walk starting");
        } else {
            tracing::info!(
                page = p.current_page,
                total_pages = p.total_pages,
                rows = p.accumulated,
                "page done"
            );
        }
    };

    let records = search(client, resolver, filter, &progress, &CancelFlag::new()).await?;
    if records.is_empty() {
        println!("no listings found");
        return Ok(());
    }

    let path = export_csv(&records, out, dir)?;
    println!("{} listings -> {}", records.len(), path.display());
    Ok(())
}
