use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bakery-map")]
#[command(about = "빵집 지도 & 마커 컨트롤러 CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 빵집 목록 (검색어/태그 필터 적용)
    Bakeries {
        /// 이름 또는 대표 메뉴 검색어
        #[arg(short, long, default_value = "")]
        query: String,

        /// 빵 종류 태그
        #[arg(short, long)]
        tag: Option<String>,

        /// 구 (예: 팔달구)
        #[arg(short, long)]
        district: Option<String>,

        /// 최소 평점
        #[arg(short, long)]
        rating: Option<f32>,

        /// 최대 개수
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// 서버 측 검색
    Search {
        /// 빵집 이름
        #[arg(short, long)]
        name: Option<String>,

        /// 빵 종류 태그
        #[arg(short, long)]
        tag: Option<String>,

        /// 최대 개수
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// 빵 종류 태그와 태그별 빵집 수
    Tags,

    /// 메모리 내 지도에 마커를 만들어 본다
    Markers {
        /// 이름 또는 대표 메뉴 검색어
        #[arg(short, long, default_value = "")]
        query: String,

        /// 빵 종류 태그
        #[arg(short, long)]
        tag: Option<String>,

        /// 배치당 마커 수 (기본: 설정값)
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// 클러스터러 없이 직접 배치
        #[arg(long)]
        no_cluster: bool,

        /// 빌드 후 이 빵집 마커를 클릭한다
        #[arg(long)]
        click: Option<String>,
    },

    /// 위시리스트
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },

    /// 방문 기록
    Visits {
        #[command(subcommand)]
        action: VisitAction,
    },

    /// 내 프로필
    Me,

    /// 설정 표시/편집
    Config {
        /// API 기본 주소
        #[arg(long)]
        set_api_base: Option<String>,

        /// 세션 쿠키 (name=value)
        #[arg(long)]
        set_session: Option<String>,

        /// 세션 쿠키 삭제
        #[arg(long)]
        clear_session: bool,

        /// 설정 표시
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum WishlistAction {
    /// 위시리스트 표시
    List,

    /// 위시리스트에 추가
    Add {
        /// 빵집 ID
        bakery_id: String,
    },

    /// 위시리스트에서 삭제
    Remove {
        /// 빵집 ID
        bakery_id: String,
    },

    /// 방문 여부/메모 수정
    Visit {
        /// 빵집 ID
        bakery_id: String,

        /// 메모
        #[arg(short, long)]
        note: Option<String>,

        /// 방문하지 않음으로 되돌린다
        #[arg(long)]
        unvisited: bool,
    },

    /// 목록에서 골라 한 번에 추가/삭제
    Edit {
        /// 이름 또는 대표 메뉴 검색어
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

#[derive(Subcommand)]
pub enum VisitAction {
    /// 방문 기록 표시 (최근 순)
    List,

    /// 방문 기록 추가
    Add {
        /// 빵집 ID
        #[arg(short, long)]
        bakery: Option<String>,

        /// 빵집 이름 (ID가 없을 때)
        #[arg(short, long)]
        name: Option<String>,

        /// 방문 날짜 (YYYY-MM-DD, 기본값 오늘)
        #[arg(short, long)]
        date: Option<String>,

        /// 평점 (1~5)
        #[arg(short, long, default_value = "5")]
        rating: u8,

        /// 구매한 빵 (쉼표로 구분)
        #[arg(long)]
        bread: Option<String>,

        /// 후기
        #[arg(long)]
        review: Option<String>,
    },

    /// 방문 기록 수정
    Edit {
        /// 방문 기록 ID
        record_id: String,

        /// 방문 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// 평점 (1~5)
        #[arg(short, long)]
        rating: Option<u8>,

        /// 구매한 빵 (쉼표로 구분)
        #[arg(long)]
        bread: Option<String>,

        /// 후기
        #[arg(long)]
        review: Option<String>,
    },

    /// 방문 기록 삭제
    Remove {
        /// 방문 기록 ID
        record_id: String,
    },
}
