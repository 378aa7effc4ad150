use tripreport_core::{
    update, AppState, BatchStatus, Msg, ReportSummary, FILE_PROMPT,
};

fn submitted(state: AppState) -> AppState {
    let (state, _) = update(
        state,
        Msg::FileSelected {
            name: "pings.csv".to_string(),
            payload: Vec::new(),
        },
    );
    let (state, _) = update(state, Msg::GenerateClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            batch_id: "b".to_string(),
            message: "started".to_string(),
        },
    );
    state
}

fn poll(state: AppState, status: BatchStatus, progress: f64, reports: Vec<ReportSummary>) -> AppState {
    let (state, _) = update(
        state,
        Msg::PollTick {
            status,
            progress,
            reports,
            error: None,
        },
    );
    state
}

#[test]
fn empty_state_shows_picker_prompt_and_disabled_submit() {
    let view = AppState::new().view();
    assert_eq!(view.file_label, FILE_PROMPT);
    assert!(!view.generate_enabled);
    assert_eq!(view.generate_label, "Generate Reports");
    assert!(view.progress.is_none());
    assert!(view.report_cards.is_empty());
}

#[test]
fn loading_disables_submit_and_relabels_the_button() {
    let state = submitted(AppState::new());
    let view = state.view();
    assert!(!view.generate_enabled);
    assert_eq!(view.generate_label, "Processing...");
}

#[test]
fn progress_is_formatted_to_one_decimal_place() {
    let state = submitted(AppState::new());
    let state = poll(state, BatchStatus::Processing, 40.0, Vec::new());
    let progress = state.view().progress.expect("progress shown");
    assert_eq!(progress.percent, 40.0);
    assert_eq!(progress.text, "40.0% Complete (0 reports generated)");

    let state = poll(state, BatchStatus::Processing, 66.666, Vec::new());
    assert_eq!(
        state.view().progress.expect("progress shown").text,
        "66.7% Complete (0 reports generated)"
    );
}

#[test]
fn report_count_suffix_appears_only_while_processing() {
    // Before the first poll response the status is still Submitted.
    let state = submitted(AppState::new());
    assert_eq!(state.view().progress.expect("progress shown").text, "0.0% Complete");

    let state = poll(
        state,
        BatchStatus::Processing,
        50.0,
        vec![ReportSummary {
            trip_id: 1,
            ping_count: 10,
            total_distance: 1.0,
            avg_speed: 2.0,
            filename: "trip_report_1_b.pdf".to_string(),
        }],
    );
    assert_eq!(
        state.view().progress.expect("progress shown").text,
        "50.0% Complete (1 reports generated)"
    );
}

#[test]
fn distance_and_speed_are_formatted_to_two_decimal_places() {
    let state = submitted(AppState::new());
    let state = poll(
        state,
        BatchStatus::Completed,
        100.0,
        vec![ReportSummary {
            trip_id: 42,
            ping_count: 310,
            total_distance: 12.3456,
            avg_speed: 45.6,
            filename: "trip_report_42_b.pdf".to_string(),
        }],
    );

    let view = state.view();
    assert_eq!(view.report_cards.len(), 1);
    let card = &view.report_cards[0];
    assert_eq!(card.trip_id, 42);
    assert_eq!(card.ping_count, 310);
    assert_eq!(card.distance_km, "12.35");
    assert_eq!(card.avg_speed_kmh, "45.60");
    assert_eq!(card.filename, "trip_report_42_b.pdf");
}

#[test]
fn progress_bar_is_hidden_once_loading_ends() {
    let state = submitted(AppState::new());
    let state = poll(state, BatchStatus::Completed, 100.0, Vec::new());
    let view = state.view();
    assert!(view.progress.is_none());
    assert!(view.generate_enabled);
}
