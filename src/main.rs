use bakery_map::{cli, client, config, error, markers, profile, scheduler, visits, wishlist};
use bakery_map_common::{
    load_all, tag_counts, Bakery, BakeryApi, BakeryFilter, BakeryQuery, BuildOutcome, SearchQuery,
    VisitRecordUpdate,
};
use clap::Parser;
use cli::{Cli, Commands, VisitAction, WishlistAction};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_bakeries(bakeries: &[Bakery]) {
    for (i, b) in bakeries.iter().enumerate() {
        let heart = if b.is_wishlisted { "♥" } else { " " };
        let pin = if b.is_mappable() { "" } else { " (좌표 없음)" };
        println!("{:>3}. {} {} ★{:.1} [{}]{}", i + 1, heart, b.name, b.rating, b.id, pin);
        println!("       {}", b.address);
        if !b.summary.is_empty() {
            println!("       {}", b.summary);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Bakeries { query, tag, district, rating, limit } => {
            let api = client::ApiClient::new(&config)?;
            let data = load_all(&api, &BakeryQuery { district, rating, limit }).await?;
            let visible = BakeryFilter::new(query, tag).apply(&data.bakeries);

            println!("🥐 빵집 {}곳 중 {}곳\n", data.bakeries.len(), visible.len());
            print_bakeries(&visible);
        }

        Commands::Search { name, tag, limit } => {
            let api = client::ApiClient::new(&config)?;
            let records = api.search(&SearchQuery { name, tag, limit }).await?;
            let found: Vec<Bakery> = records.into_iter().map(|r| Bakery::from_record(r, false)).collect();

            println!("🔍 검색 결과 {}곳\n", found.len());
            print_bakeries(&found);
        }

        Commands::Tags => {
            let api = client::ApiClient::new(&config)?;
            let data = load_all(&api, &BakeryQuery::default()).await?;

            println!("🏷 빵 종류 {}개\n", data.tags.len());
            for (name, count) in tag_counts(&data.bakeries, &data.tags) {
                println!("  {} ({})", name, count);
            }
        }

        Commands::Markers { query, tag, batch_size, no_cluster, click } => {
            println!("🗺 bakery-map - 마커 빌드\n");

            println!("[1/2] 빵집 데이터 로드 중...");
            let api = client::ApiClient::new(&config)?;
            let data = load_all(&api, &BakeryQuery::default()).await?;
            let visible = BakeryFilter::new(query, tag).apply(&data.bakeries);
            println!("✔ {}곳 중 {}곳 표시 대상\n", data.bakeries.len(), visible.len());

            println!("[2/2] 마커 생성 중...");
            let mut map_config = config.map.clone();
            if let Some(size) = batch_size {
                map_config.batch_size = size;
            }

            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} 마커") {
                pb.set_style(style.progress_chars("=>-"));
            }

            let run = markers::MarkerRun {
                config: map_config,
                clustering: !no_cluster,
                click: click.as_deref(),
            };
            let report = markers::run(run, &visible, scheduler::TokioScheduler, |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })
            .await?;
            pb.finish_and_clear();

            match report.outcome {
                BuildOutcome::Completed { markers: count } => println!("✔ 마커 {}개 생성", count),
                other => println!("⚠ 빌드 중단: {:?}", other),
            }
            println!("  좌표 없음: {}곳", report.skipped());
            println!("  배치 방식: {}", if report.clustered { "클러스터러" } else { "직접 배치" });

            if let Some(id) = click.as_deref() {
                match &report.clicked {
                    Some(b) => println!("  선택: {} (강조 마커 {:?})", b.name, report.selected_markers),
                    None => println!("  ⚠ 클릭할 마커 없음: {}", id),
                }
            }
        }

        Commands::Wishlist { action } => {
            let api = client::ApiClient::new(&config)?;
            match action {
                WishlistAction::List => wishlist::list(&api).await?,
                WishlistAction::Add { bakery_id } => {
                    if wishlist::set_membership(&api, &bakery_id, true).await? {
                        println!("✔ 위시리스트에 추가했습니다: {}", bakery_id);
                    } else {
                        println!("이미 위시리스트에 있습니다: {}", bakery_id);
                    }
                }
                WishlistAction::Remove { bakery_id } => {
                    if wishlist::set_membership(&api, &bakery_id, false).await? {
                        println!("✔ 위시리스트에서 삭제했습니다: {}", bakery_id);
                    } else {
                        println!("위시리스트에 없습니다: {}", bakery_id);
                    }
                }
                WishlistAction::Visit { bakery_id, note, unvisited } => {
                    wishlist::mark_visit(&api, &bakery_id, note, !unvisited).await?
                }
                WishlistAction::Edit { query } => wishlist::edit(&api, &query).await?,
            }
        }

        Commands::Visits { action } => {
            let api = client::ApiClient::new(&config)?;
            match action {
                VisitAction::List => visits::list(&api).await?,
                VisitAction::Add { bakery, name, date, rating, bread, review } => {
                    let args = visits::NewVisitArgs { bakery, name, date, rating, bread, review };
                    visits::add(&api, args).await?
                }
                VisitAction::Edit { record_id, date, rating, bread, review } => {
                    let update = VisitRecordUpdate { visit_date: None, rating, bread_purchased: bread, review };
                    visits::edit(&api, &record_id, date, update).await?
                }
                VisitAction::Remove { record_id } => visits::remove(&api, &record_id).await?,
            }
        }

        Commands::Me => {
            let api = client::ApiClient::new(&config)?;
            profile::show(&api).await?;
        }

        Commands::Config { set_api_base, set_session, clear_session, show } => {
            // 환경 변수 값이 파일에 저장되지 않도록 파일만 읽는다
            let mut config = Config::load_from(&Config::config_path()?)?;
            let changed = set_api_base.is_some() || set_session.is_some() || clear_session;

            if let Some(base) = set_api_base {
                config.api_base = base;
            }
            if let Some(session) = set_session {
                config.session_cookie = Some(session);
            }
            if clear_session {
                config.session_cookie = None;
            }

            if changed {
                config.api_base()?;
                config.save()?;
                println!("✔ 설정을 저장했습니다: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("설정:");
                println!("  API 주소: {}", config.api_base);
                println!("  세션: {}", if config.session_cookie.is_some() { "설정됨" } else { "없음" });
                println!("  배치 크기: {}", config.map.batch_size);
                println!("  배치 간격: {}ms", config.map.batch_delay_ms);
                println!("  클러스터 최소 레벨: {}", config.map.cluster_min_level);
            }
        }
    }

    Ok(())
}
