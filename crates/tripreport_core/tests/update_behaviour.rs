use std::sync::Once;

use tripreport_core::{
    update, AppState, Effect, Msg, FALLBACK_SUBMIT, MSG_SELECT_FILE_FIRST, MSG_SELECT_WORKSHEET,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(session_logging::initialize_for_tests);
}

fn select_file(state: AppState, name: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::FileSelected {
            name: name.to_string(),
            payload: b"lat,lon,ts".to_vec(),
        },
    )
}

fn select_xlsx_with_sheets(state: AppState, sheets: &[&str]) -> AppState {
    let (state, _) = select_file(state, "pings.xlsx");
    let (state, _) = update(
        state,
        Msg::WorksheetsLoaded {
            worksheets: sheets.iter().map(|s| s.to_string()).collect(),
        },
    );
    state
}

#[test]
fn csv_selection_never_requests_worksheets() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = select_file(state, "pings.csv");

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.file_label, "pings.csv");
    assert!(view.worksheet_picker.is_none());
    assert!(view.generate_enabled);
}

#[test]
fn xlsx_selection_always_requests_worksheets() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = select_file(state, "pings.xlsx");

    assert_eq!(
        effects,
        vec![Effect::ListWorksheets {
            file_name: "pings.xlsx".to_string(),
            payload: b"lat,lon,ts".to_vec(),
        }]
    );
    // Listing is in flight; the UI shows the loading state.
    assert!(state.is_loading());
    assert!(!state.view().generate_enabled);
}

#[test]
fn worksheets_default_to_first_entry() {
    init_logging();
    let state = AppState::new();
    let state = select_xlsx_with_sheets(state, &["Sheet1", "Sheet2"]);

    let picker = state.view().worksheet_picker.expect("picker shown");
    assert_eq!(picker.options, vec!["Sheet1", "Sheet2"]);
    assert_eq!(picker.selected.as_deref(), Some("Sheet1"));
    assert!(!state.is_loading());
}

#[test]
fn worksheet_listing_failure_surfaces_backend_message() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.xlsx");
    let (state, effects) = update(
        state,
        Msg::WorksheetListFailed {
            message: Some("Error reading Excel file: bad zip".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().error_banner.as_deref(),
        Some("Error reading Excel file: bad zip")
    );
    assert!(state.view().worksheet_picker.is_none());
    assert!(!state.is_loading());
}

#[test]
fn worksheet_listing_failure_falls_back_to_fixed_message() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.xlsx");
    let (state, _) = update(state, Msg::WorksheetListFailed { message: None });

    assert_eq!(
        state.view().error_banner.as_deref(),
        Some("Error reading Excel file")
    );
}

#[test]
fn generate_without_file_is_local_error_with_no_effects() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::GenerateClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().error_banner.as_deref(), Some(MSG_SELECT_FILE_FIRST));
}

#[test]
fn generate_xlsx_without_worksheet_is_local_error() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.xlsx");
    // Listing failed, so no worksheet ever got selected.
    let (state, _) = update(state, Msg::WorksheetListFailed { message: None });

    let (state, effects) = update(state, Msg::GenerateClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().error_banner.as_deref(), Some(MSG_SELECT_WORKSHEET));
}

#[test]
fn generate_csv_submits_without_worksheet_field() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.csv");
    let (state, effects) = update(state, Msg::GenerateClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitBatch {
            file_name: "pings.csv".to_string(),
            payload: b"lat,lon,ts".to_vec(),
            worksheet_name: None,
        }]
    );
    assert!(state.is_loading());
    assert!(state.view().error_banner.is_none());
}

#[test]
fn generate_xlsx_submits_selected_worksheet() {
    init_logging();
    let state = AppState::new();
    let state = select_xlsx_with_sheets(state, &["Sheet1", "Sheet2"]);
    let (state, _) = update(state, Msg::WorksheetSelected("Sheet2".to_string()));
    let (_, effects) = update(state, Msg::GenerateClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitBatch {
            file_name: "pings.xlsx".to_string(),
            payload: b"lat,lon,ts".to_vec(),
            worksheet_name: Some("Sheet2".to_string()),
        }]
    );
}

#[test]
fn generate_clears_previous_error() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::GenerateClicked);
    assert!(state.view().error_banner.is_some());

    let (state, _) = select_file(state, "pings.csv");
    let (state, _) = update(state, Msg::GenerateClicked);
    assert!(state.view().error_banner.is_none());
}

#[test]
fn submit_success_opens_batch_and_starts_polling() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.csv");
    let (state, _) = update(state, Msg::GenerateClicked);
    let (mut state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            batch_id: "batch-1".to_string(),
            message: "Batch PDF generation started".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            batch_id: "batch-1".to_string(),
        }]
    );
    assert_eq!(state.batch().map(|b| b.id.as_str()), Some("batch-1"));
    assert_eq!(
        state.view().success_banner.as_deref(),
        Some("Batch PDF generation started")
    );
    // Loading stays on until a terminal poll response clears it.
    assert!(state.is_loading());
    assert!(state.consume_dirty());
}

#[test]
fn submit_failure_surfaces_backend_message_and_clears_loading() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.csv");
    let (state, _) = update(state, Msg::GenerateClicked);
    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            message: Some("Missing required columns: ['latitude']".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().error_banner.as_deref(),
        Some("Missing required columns: ['latitude']")
    );
    assert!(!state.is_loading());
}

#[test]
fn submit_failure_falls_back_to_fixed_message() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.csv");
    let (state, _) = update(state, Msg::GenerateClicked);
    let (state, _) = update(state, Msg::SubmitFailed { message: None });

    assert_eq!(state.view().error_banner.as_deref(), Some(FALLBACK_SUBMIT));
}

#[test]
fn selecting_new_file_resets_session_and_stops_polling() {
    init_logging();
    let state = AppState::new();
    let (state, _) = select_file(state, "pings.csv");
    let (state, _) = update(state, Msg::GenerateClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            batch_id: "batch-1".to_string(),
            message: "started".to_string(),
        },
    );

    let (state, effects) = select_file(state, "other.csv");

    // The batch identifier cleared, so the poll task must be torn down.
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert!(state.batch().is_none());
    let view = state.view();
    assert_eq!(view.file_label, "other.csv");
    assert!(view.worksheet_picker.is_none());
    assert!(view.error_banner.is_none());
    assert!(view.success_banner.is_none());
    assert!(view.report_cards.is_empty());
}
