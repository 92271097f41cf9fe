//! Import wizard update logic
//!
//! The central `update` function applies a message to the wizard state and
//! returns the side effect to run. Guard failures never transition; they
//! set `state.error` for the presentation layer to surface.

use std::sync::Arc;

use crate::backend::{ImportBackend, ImportConfig};
use crate::catalog;
use crate::services::reconcile;

use super::command::Command;
use super::msg::Msg;
use super::state::State;
use super::types::WizardStep;

pub fn update(state: &mut State, msg: Msg, backend: &Arc<dyn ImportBackend>) -> Command<Msg> {
    match msg {
        // === Navigation ===
        Msg::Next => handle_next(state, backend),
        Msg::Back => {
            if let Some(prev) = state.step.prev() {
                state.step = prev;
            }
            Command::None
        }
        Msg::Reset => {
            // The tag stays monotonic so a response to a call issued before
            // the reset no longer matches and gets discarded.
            let tag = state.call_tag + 1;
            *state = State::default();
            state.call_tag = tag;
            Command::None
        }

        // === Step 1: Source selection ===
        Msg::FileSelected(file) => {
            state.source.file_type_error = false;
            state.validation = None;
            state.import = None;

            if file.is_csv() {
                state.source.selected_file = Some(file);
            } else {
                log::warn!("rejected non-CSV file: {}", file.name);
                state.source.selected_file = None;
                state.source.file_type_error = true;
            }
            Command::None
        }
        Msg::TableSelected(table_id) => {
            if catalog::table(&table_id).is_none() {
                state.error = Some(format!("Unknown destination table: {}", table_id));
                return Command::None;
            }
            state.mappings = reconcile::default_mappings(&table_id);
            state.source.selected_table = Some(table_id);
            Command::None
        }
        Msg::ImportTypeSelected(import_type) => {
            state.import_type = import_type;
            Command::None
        }

        // === Step 3: Column mapping ===
        Msg::MappingTargetChanged { index, target } => {
            let Some(mapping) = state.mappings.get_mut(index) else {
                return Command::None;
            };
            if let Some(field_id) = &target {
                let known = state
                    .source
                    .selected_table
                    .as_deref()
                    .map(catalog::fields)
                    .is_some_and(|fields| fields.iter().any(|f| f.id == field_id.as_str()));
                if !known {
                    state.error = Some(format!("Unknown destination field: {}", field_id));
                    return Command::None;
                }
            }
            mapping.target_field = target;
            mapping.matched_by = None;
            Command::None
        }

        // === Step 4: Advanced options ===
        Msg::AdvancedToggled(option) => {
            state.advanced.toggle(option);
            Command::None
        }
        Msg::DelimiterChanged(delimiter) => {
            state.advanced.delimiter = delimiter;
            Command::None
        }
        Msg::EncodingChanged(encoding) => {
            state.advanced.encoding = encoding;
            Command::None
        }

        // === Backend responses ===
        Msg::ValidationLoaded { tag, result } => {
            if tag != state.call_tag {
                log::debug!("discarding stale validation response (tag {})", tag);
                return Command::None;
            }
            state.is_loading = false;
            match result {
                Ok(report) => {
                    // Recompute the mapping from the detected headers.
                    if let (Some(preview), Some(table)) =
                        (&report.preview, &state.source.selected_table)
                    {
                        state.mappings =
                            reconcile::reconcile_headers(&preview.headers, catalog::fields(table));
                    }
                    state.validation = Some(report);
                }
                Err(e) => {
                    state.error = Some(format!("Error while validating the file: {}", e));
                }
            }
            Command::None
        }
        Msg::ImportFinished { tag, result } => {
            if tag != state.call_tag {
                log::debug!("discarding stale import response (tag {})", tag);
                return Command::None;
            }
            state.is_loading = false;
            match result {
                Ok(outcome) => {
                    // Interrupted and error outcomes still reach the results
                    // step; failure is shown as a result, not a blocked
                    // transition.
                    state.import = Some(outcome);
                    state.step = WizardStep::Results;
                }
                Err(e) => {
                    state.error = Some(format!("Error while importing the data: {}", e));
                }
            }
            Command::None
        }

        // === General ===
        Msg::DismissError => {
            state.error = None;
            Command::None
        }
    }
}

/// Handle forward navigation; the central guarded transition.
fn handle_next(state: &mut State, backend: &Arc<dyn ImportBackend>) -> Command<Msg> {
    if state.is_loading {
        log::debug!("ignoring Next while a backend call is in flight");
        return Command::None;
    }

    match state.step {
        WizardStep::SelectSource => {
            if let Some(message) = state.source.validation_error() {
                state.error = Some(message.to_string());
                return Command::None;
            }

            state.step = WizardStep::Validate;
            state.error = None;
            state.validation = None;
            state.is_loading = true;
            state.call_tag += 1;
            let tag = state.call_tag;

            let file = state.source.selected_file.clone().unwrap();
            let table = state.source.selected_table.clone().unwrap();
            let backend = Arc::clone(backend);
            Command::perform(
                async move { backend.validate(&file, &table).await.map_err(|e| e.to_string()) },
                move |result| Msg::ValidationLoaded { tag, result },
            )
        }
        WizardStep::Validate => {
            match &state.validation {
                Some(report) if report.is_valid => {
                    state.step = WizardStep::MapColumns;
                    state.error = None;
                }
                _ => {
                    state.error =
                        Some("Resolve the validation errors before proceeding".to_string());
                }
            }
            Command::None
        }
        WizardStep::MapColumns => {
            let unmet = state.unmet_required();
            if unmet.is_empty() {
                state.step = WizardStep::Configure;
                state.error = None;
            } else {
                state.error = Some(format!(
                    "Some required fields are not mapped: {}",
                    unmet.join(", ")
                ));
            }
            Command::None
        }
        WizardStep::Configure => {
            let (Some(file), Some(table)) = (
                state.source.selected_file.clone(),
                state.source.selected_table.clone(),
            ) else {
                state.error = Some("Select a destination table and a CSV file".to_string());
                return Command::None;
            };

            state.error = None;
            state.import = None;
            state.is_loading = true;
            state.call_tag += 1;
            let tag = state.call_tag;

            let import_type = state.import_type;
            let config = ImportConfig {
                mappings: state.mappings.clone(),
                options: state.advanced.clone(),
            };
            let backend = Arc::clone(backend);
            Command::perform(
                async move {
                    backend
                        .import(&file, &table, import_type, &config)
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| Msg::ImportFinished { tag, result },
            )
        }
        WizardStep::Results => Command::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CsvFile, ImportOutcome};
    use crate::wizard::testing::{completed_outcome, csv_file, stub_backend, valid_report};

    fn ready_state() -> State {
        let mut state = State::default();
        let backend = stub_backend();
        update(&mut state, Msg::FileSelected(csv_file()), &backend);
        update(&mut state, Msg::TableSelected("products".to_string()), &backend);
        state
    }

    #[test]
    fn test_file_type_rejection_clears_selection() {
        let mut state = State::default();
        let backend = stub_backend();

        let file = CsvFile::new("data.txt", Some("text/plain".to_string()), 42);
        update(&mut state, Msg::FileSelected(file), &backend);

        assert!(state.source.selected_file.is_none());
        assert!(state.source.file_type_error);
    }

    #[test]
    fn test_file_selection_clears_stale_results() {
        let mut state = ready_state();
        let backend = stub_backend();
        state.validation = Some(valid_report(&["sku"]));
        state.import = Some(completed_outcome());

        update(&mut state, Msg::FileSelected(csv_file()), &backend);

        assert!(state.validation.is_none());
        assert!(state.import.is_none());
        assert!(!state.source.file_type_error);
    }

    #[test]
    fn test_unknown_table_is_reported() {
        let mut state = State::default();
        let backend = stub_backend();

        update(&mut state, Msg::TableSelected("warehouse".to_string()), &backend);

        assert!(state.source.selected_table.is_none());
        assert!(state.error.as_deref().unwrap().contains("warehouse"));
    }

    #[test]
    fn test_table_selection_loads_seed_mapping() {
        let mut state = State::default();
        let backend = stub_backend();

        update(&mut state, Msg::TableSelected("customers".to_string()), &backend);

        assert_eq!(state.source.selected_table.as_deref(), Some("customers"));
        assert!(state.mappings.iter().any(|m| m.targets("email")));
    }

    #[test]
    fn test_next_from_step_one_is_guarded() {
        let mut state = State::default();
        let backend = stub_backend();

        let cmd = update(&mut state, Msg::Next, &backend);

        assert!(cmd.is_none());
        assert_eq!(state.step, WizardStep::SelectSource);
        assert!(state.error.is_some());
    }

    #[test]
    fn test_next_from_step_one_issues_validate() {
        let mut state = ready_state();
        let backend = stub_backend();

        let cmd = update(&mut state, Msg::Next, &backend);

        assert!(matches!(cmd, Command::Perform(_)));
        assert_eq!(state.step, WizardStep::Validate);
        assert!(state.is_loading);
        assert_eq!(state.call_tag, 1);
    }

    #[test]
    fn test_next_is_rejected_while_loading() {
        let mut state = ready_state();
        let backend = stub_backend();
        update(&mut state, Msg::Next, &backend);
        assert!(state.is_loading);

        let cmd = update(&mut state, Msg::Next, &backend);

        assert!(cmd.is_none());
        assert_eq!(state.step, WizardStep::Validate);
        assert_eq!(state.call_tag, 1);
    }

    #[test]
    fn test_validation_response_reconciles_mappings() {
        let mut state = ready_state();
        let backend = stub_backend();
        update(&mut state, Msg::Next, &backend);

        let report = valid_report(&["ID", "Prezzo", "Disponibilità"]);
        update(
            &mut state,
            Msg::ValidationLoaded { tag: 1, result: Ok(report) },
            &backend,
        );

        assert!(!state.is_loading);
        assert_eq!(state.mappings.len(), 3);
        assert_eq!(state.mappings[1].target_field.as_deref(), Some("price"));
        assert_eq!(state.mappings[2].target_field, None);
    }

    #[test]
    fn test_stale_validation_response_is_discarded() {
        let mut state = ready_state();
        let backend = stub_backend();
        update(&mut state, Msg::Next, &backend);
        update(&mut state, Msg::Reset, &backend);

        update(
            &mut state,
            Msg::ValidationLoaded { tag: 1, result: Ok(valid_report(&["sku"])) },
            &backend,
        );

        assert_eq!(state.step, WizardStep::SelectSource);
        assert!(state.validation.is_none());
        assert!(state.mappings.is_empty());
    }

    #[test]
    fn test_validation_transport_error_clears_loading() {
        let mut state = ready_state();
        let backend = stub_backend();
        update(&mut state, Msg::Next, &backend);

        update(
            &mut state,
            Msg::ValidationLoaded { tag: 1, result: Err("connection refused".to_string()) },
            &backend,
        );

        assert!(!state.is_loading);
        assert!(state.validation.is_none());
        assert!(state.error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(state.step, WizardStep::Validate);
    }

    #[test]
    fn test_next_from_validation_requires_valid_report() {
        let mut state = ready_state();
        let backend = stub_backend();
        state.step = WizardStep::Validate;

        update(&mut state, Msg::Next, &backend);
        assert_eq!(state.step, WizardStep::Validate);
        assert!(state.error.is_some());

        state.error = None;
        let mut report = valid_report(&["sku"]);
        report.is_valid = false;
        state.validation = Some(report);
        update(&mut state, Msg::Next, &backend);
        assert_eq!(state.step, WizardStep::Validate);

        state.validation = Some(valid_report(&["sku"]));
        update(&mut state, Msg::Next, &backend);
        assert_eq!(state.step, WizardStep::MapColumns);
    }

    #[test]
    fn test_next_from_mapping_reports_unmet_fields() {
        let mut state = ready_state();
        let backend = stub_backend();
        state.step = WizardStep::MapColumns;
        state.mappings.retain(|m| !m.targets("sku"));

        update(&mut state, Msg::Next, &backend);

        assert_eq!(state.step, WizardStep::MapColumns);
        assert!(state.error.as_deref().unwrap().contains("sku"));
    }

    #[test]
    fn test_import_response_reaches_results_even_on_failure() {
        let mut state = ready_state();
        let backend = stub_backend();
        state.step = WizardStep::Configure;
        update(&mut state, Msg::Next, &backend);
        assert!(state.is_loading);

        let outcome = ImportOutcome::Error {
            code: "SYSTEM_ERROR".to_string(),
            message: "boom".to_string(),
            system_message: "db down".to_string(),
            suggestions: vec![],
            timestamp: chrono::Utc::now(),
        };
        let tag = state.call_tag;
        update(
            &mut state,
            Msg::ImportFinished { tag, result: Ok(outcome) },
            &backend,
        );

        assert!(!state.is_loading);
        assert_eq!(state.step, WizardStep::Results);
        assert!(!state.import.as_ref().unwrap().succeeded());
    }

    #[test]
    fn test_manual_mapping_edit_validates_field() {
        let mut state = ready_state();
        let backend = stub_backend();

        update(
            &mut state,
            Msg::MappingTargetChanged { index: 0, target: Some("nonexistent".to_string()) },
            &backend,
        );
        assert!(state.error.is_some());
        assert_eq!(state.mappings[0].target_field.as_deref(), Some("id"));

        state.error = None;
        update(
            &mut state,
            Msg::MappingTargetChanged { index: 0, target: Some("is_active".to_string()) },
            &backend,
        );
        assert!(state.error.is_none());
        assert_eq!(state.mappings[0].target_field.as_deref(), Some("is_active"));
    }

    #[test]
    fn test_back_floors_at_first_step() {
        let mut state = State::default();
        let backend = stub_backend();

        update(&mut state, Msg::Back, &backend);
        assert_eq!(state.step, WizardStep::SelectSource);

        state.step = WizardStep::MapColumns;
        update(&mut state, Msg::Back, &backend);
        assert_eq!(state.step, WizardStep::Validate);
        // Going back loses nothing.
        assert_eq!(state.source.selected_table, None);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = ready_state();
        let backend = stub_backend();
        state.step = WizardStep::Configure;
        state.import_type = crate::catalog::ImportType::Replace;
        state.advanced.strict_validation = true;
        state.validation = Some(valid_report(&["sku"]));
        state.error = Some("leftover".to_string());

        update(&mut state, Msg::Reset, &backend);

        assert_eq!(state.step, WizardStep::SelectSource);
        assert!(state.source.selected_file.is_none());
        assert!(state.source.selected_table.is_none());
        assert!(!state.source.file_type_error);
        assert_eq!(state.import_type, crate::catalog::ImportType::Update);
        assert_eq!(state.advanced, crate::backend::AdvancedOptions::default());
        assert!(state.mappings.is_empty());
        assert!(state.validation.is_none());
        assert!(state.import.is_none());
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }
}
