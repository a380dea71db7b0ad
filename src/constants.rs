//! Application constants and configuration

pub const APP_NAME: &str = "CREA-MG Relatorio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WINDOW_TITLE: &str = "CREA-MG - Relatório de Inspeções";

/// Workbook read when neither the env var nor the settings name one
pub const DEFAULT_WORKBOOK: &str = "../Dados/PESQUISA DE ART 2022 2023 2024.xlsx";
pub const WORKBOOK_ENV_VAR: &str = "CREA_REPORT_WORKBOOK";

/// Zero-based row holding the column labels in every sheet
pub const HEADER_ROW: usize = 7;
/// Year assigned to the first sheet when sheet names are not years
pub const FIRST_YEAR: i32 = 2022;
/// Year shown before the user picks one
pub const PREFERRED_YEAR: i32 = 2023;

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_CACHE_TTL_DAYS: u64 = 7;
pub const SECS_PER_DAY: u64 = 86_400;

// Column labels after reshaping
pub const COL_CITY: &str = "CIDADE";
pub const COL_REGISTERED: &str = "DATA REGISTRO";
pub const COL_TITLES: &str = "TITULOS";
pub const COL_ACTIVITIES: &str = "ATIVIDADES";
pub const COL_NOTES: &str = "OBSERVACAO OBRA SERVICO";

/// Cell texts read as missing values, so rows holding them are dropped
pub const MISSING_VALUE_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Sheets whose labels sit one column left of their data
pub const SHIFTED_HEADER_YEARS: &[i32] = &[2023];

// Branding
pub const ORG_SHORT: &str = "CREA-MG";
pub const ORG_NAME: &str = "Conselho Regional de Engenharia e Agronomia de Minas Gerais";
pub const ORG_ADDRESS: &str = "Av. Álvares Cabral, 1600 - Santo Agostinho, Belo Horizonte - MG";
pub const ORG_URL: &str = "http://www.crea-mg.org.br";
pub const ORG_URL_LABEL: &str = "www.crea-mg.org.br";

// Chart text
pub const CHART_TITLE: &str = "Ranking de Atividades Inspecionadas";
pub const CHART_X_LABEL: &str = "Percentual de Inspeções (%)";
pub const CHART_Y_LABEL: &str = "Atividades";
