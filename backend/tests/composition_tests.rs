//! Weather measurement composition tests
//!
//! Exercises the composition resolver against the in-memory store:
//! - a measurement is created only when all four kinds exist for the date
//! - relinking on a date change is all-or-nothing
//! - deletes never cascade and leave inspectable dangling links

use std::sync::Arc;

use meteo_backend::services::{ObservationService, WeatherMeasurementService};
use meteo_backend::{AppError, MemoryStore, SharedStore};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    CreateHumidityInput, CreatePrecipitationInput, CreatePressureInput, CreateWeatherMeasurementInput,
    CreateWindInput, ObservationKind, ObservationSet, UpdateWeatherMeasurementInput,
    UpdateWindInput,
};

fn new_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

fn measurement_for(date: &str) -> CreateWeatherMeasurementInput {
    CreateWeatherMeasurementInput {
        date: Some(date.to_string()),
        ..Default::default()
    }
}

async fn record(observations: &ObservationService, kind: ObservationKind, date: &str) -> i64 {
    let date = Some(date.to_string());
    let observation = match kind {
        ObservationKind::Wind => {
            observations
                .create(CreateWindInput {
                    wind_speed: Some(Decimal::new(42, 1)),
                    date,
                    ..Default::default()
                })
                .await
        }
        ObservationKind::Pressure => {
            observations
                .create(CreatePressureInput {
                    pressure_value: Some(Decimal::new(10132, 1)),
                    date,
                })
                .await
        }
        ObservationKind::Humidity => {
            observations
                .create(CreateHumidityInput {
                    date,
                    ..Default::default()
                })
                .await
        }
        ObservationKind::Precipitation => {
            observations
                .create(CreatePrecipitationInput {
                    precipitation_type: Some("rain".to_string()),
                    date,
                    ..Default::default()
                })
                .await
        }
    };
    observation.unwrap().id()
}

async fn record_all(observations: &ObservationService, date: &str) -> ObservationSet {
    ObservationSet {
        wind_id: record(observations, ObservationKind::Wind, date).await,
        pressure_id: record(observations, ObservationKind::Pressure, date).await,
        humidity_id: record(observations, ObservationKind::Humidity, date).await,
        precipitation_id: record(observations, ObservationKind::Precipitation, date).await,
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_links_observations_for_the_date() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);

    // Noise on another date must not be picked up
    record_all(&observations, "2024-02-29").await;
    let expected = record_all(&observations, "2024-03-01").await;

    let measurement = measurements
        .create(CreateWeatherMeasurementInput {
            geographic_zone_id: Some(7),
            cloud_amount: Some(Decimal::new(35, 1)),
            ..measurement_for("2024-03-01")
        })
        .await
        .unwrap();

    assert_eq!(measurement.observations(), expected);
    assert_eq!(measurement.date.to_string(), "2024-03-01");
    assert_eq!(measurement.geographic_zone_id, Some(7));
    assert_eq!(measurement.cloud_amount, Some(Decimal::new(35, 1)));
}

#[tokio::test]
async fn test_create_fails_when_a_kind_is_missing() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);

    record(&observations, ObservationKind::Wind, "2024-03-01").await;
    record(&observations, ObservationKind::Pressure, "2024-03-01").await;
    record(&observations, ObservationKind::Precipitation, "2024-03-01").await;
    // Humidity exists, but for the wrong date
    record(&observations, ObservationKind::Humidity, "2024-03-02").await;

    let err = measurements
        .create(measurement_for("2024-03-01"))
        .await
        .unwrap_err();

    match err {
        AppError::IncompleteObservationSet { missing, .. } => {
            assert_eq!(missing, vec![ObservationKind::Humidity]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(measurements.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_reports_every_missing_kind() {
    let measurements = WeatherMeasurementService::new(new_store());

    let err = measurements
        .create(measurement_for("2024-03-01"))
        .await
        .unwrap_err();

    match err {
        AppError::IncompleteObservationSet { missing, .. } => {
            assert_eq!(missing, ObservationKind::ALL.to_vec());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_rejects_missing_or_malformed_date() {
    let measurements = WeatherMeasurementService::new(new_store());

    let err = measurements
        .create(CreateWeatherMeasurementInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Date"));

    let err = measurements.create(measurement_for("")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Date"));

    for raw in ["03/01/2024", "2024-3-1", "2024-02-30", "yesterday"] {
        let err = measurements.create(measurement_for(raw)).await.unwrap_err();
        assert!(
            matches!(err, AppError::InvalidDateFormat { ref value, .. } if value == raw),
            "{} should be rejected as malformed",
            raw
        );
    }
}

#[tokio::test]
async fn test_duplicate_measurements_for_a_date_are_allowed() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    let expected = record_all(&observations, "2024-03-01").await;

    let first = measurements.create(measurement_for("2024-03-01")).await.unwrap();
    let second = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.observations(), expected);
    assert_eq!(second.observations(), expected);
}

#[tokio::test]
async fn test_lowest_identifier_wins_when_a_date_has_several_observations() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);

    let expected = record_all(&observations, "2024-03-01").await;
    // A second reading of every kind on the same date
    record_all(&observations, "2024-03-01").await;

    let measurement = measurements.create(measurement_for("2024-03-01")).await.unwrap();
    assert_eq!(measurement.observations(), expected);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_without_date_keeps_links() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    let expected = record_all(&observations, "2024-03-01").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    // Observations recorded later on the same date must not be picked up
    record_all(&observations, "2024-03-01").await;

    let updated = measurements
        .update(
            created.id,
            UpdateWeatherMeasurementInput {
                max_temperature_2m: Some(Some(Decimal::new(281, 1))),
                geographic_zone_id: Some(Some(3)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.observations(), expected);
    assert_eq!(updated.date, created.date);
    assert_eq!(updated.max_temperature_2m, Some(Decimal::new(281, 1)));
    assert_eq!(updated.geographic_zone_id, Some(3));
}

#[tokio::test]
async fn test_update_with_null_field_clears_it() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    record_all(&observations, "2024-03-01").await;
    let created = measurements
        .create(CreateWeatherMeasurementInput {
            cloud_amount: Some(Decimal::new(5, 0)),
            geographic_zone_id: Some(2),
            ..measurement_for("2024-03-01")
        })
        .await
        .unwrap();

    let updated = measurements
        .update(
            created.id,
            UpdateWeatherMeasurementInput {
                cloud_amount: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.cloud_amount, None);
    assert_eq!(updated.geographic_zone_id, Some(2));
}

#[tokio::test]
async fn test_update_with_new_date_relinks_all_four() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    record_all(&observations, "2024-03-01").await;
    let next_day = record_all(&observations, "2024-03-02").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    let updated = measurements
        .update(
            created.id,
            UpdateWeatherMeasurementInput {
                date: Some(Some("2024-03-02".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.observations(), next_day);
    assert_eq!(updated.date.to_string(), "2024-03-02");
    assert_eq!(measurements.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_failed_relink_changes_nothing() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    record_all(&observations, "2024-03-01").await;
    record(&observations, ObservationKind::Wind, "2024-03-02").await;
    record(&observations, ObservationKind::Pressure, "2024-03-02").await;
    record(&observations, ObservationKind::Humidity, "2024-03-02").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    let err = measurements
        .update(
            created.id,
            UpdateWeatherMeasurementInput {
                date: Some(Some("2024-03-02".to_string())),
                cloud_amount: Some(Some(Decimal::new(9, 0))),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::IncompleteObservationSet { missing, .. } => {
            assert_eq!(missing, vec![ObservationKind::Precipitation]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(measurements.get(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_update_rejects_null_or_malformed_date() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    record_all(&observations, "2024-03-01").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    // A present but empty date is malformed rather than missing
    for date in [None, Some(String::new()), Some("1st of March".to_string())] {
        let err = measurements
            .update(
                created.id,
                UpdateWeatherMeasurementInput {
                    date: Some(date),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { ref field, .. } if field == "Date"));
    }
    assert_eq!(measurements.get(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_update_unknown_measurement_is_not_found() {
    let measurements = WeatherMeasurementService::new(new_store());

    let err = measurements
        .update(99, UpdateWeatherMeasurementInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_editing_an_observation_does_not_relink_measurements() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    let expected = record_all(&observations, "2024-03-01").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    observations
        .update(
            expected.wind_id,
            UpdateWindInput {
                date: Some(Some("2024-04-01".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let measurement = measurements.get(created.id).await.unwrap();
    assert_eq!(measurement.wind_id, expected.wind_id);
    assert_eq!(measurement.date.to_string(), "2024-03-01");
}

// ============================================================================
// Delete and links
// ============================================================================

#[tokio::test]
async fn test_deleting_an_observation_leaves_a_dangling_link() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    let expected = record_all(&observations, "2024-03-01").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    observations
        .delete(ObservationKind::Humidity, expected.humidity_id)
        .await
        .unwrap();

    // The measurement itself is untouched
    assert_eq!(measurements.get(created.id).await.unwrap(), created);

    let links = measurements.links(created.id).await.unwrap();
    let humidity = links.iter().find(|l| l.field == "Humidity_ID").unwrap();
    assert_eq!(humidity.id, Some(expected.humidity_id));
    assert!(!humidity.present);

    let wind = links.iter().find(|l| l.field == "Wind_ID").unwrap();
    assert!(wind.present);
}

#[tokio::test]
async fn test_links_report_absent_zone() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    record_all(&observations, "2024-03-01").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    let links = measurements.links(created.id).await.unwrap();
    assert_eq!(links.len(), 5);

    let zone = links.last().unwrap();
    assert_eq!(zone.field, "GeographicZone_ID");
    assert_eq!(zone.id, None);
    assert!(!zone.present);
}

#[tokio::test]
async fn test_delete_measurement_then_not_found() {
    let store = new_store();
    let observations = ObservationService::new(store.clone());
    let measurements = WeatherMeasurementService::new(store);
    record_all(&observations, "2024-03-01").await;
    let created = measurements.create(measurement_for("2024-03-01")).await.unwrap();

    measurements.delete(created.id).await.unwrap();

    assert!(matches!(
        measurements.get(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        measurements.delete(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// A measurement is created iff every kind is recorded for the date,
    /// and a refusal names exactly the kinds that are absent.
    #[test]
    fn prop_create_succeeds_iff_all_kinds_present(present in proptest::collection::vec(any::<bool>(), 4)) {
        let outcome = tokio_test::block_on(async {
            let store = new_store();
            let observations = ObservationService::new(store.clone());
            let measurements = WeatherMeasurementService::new(store);

            for (kind, recorded) in ObservationKind::ALL.into_iter().zip(&present) {
                if *recorded {
                    record(&observations, kind, "2024-06-15").await;
                }
            }

            let result = measurements.create(measurement_for("2024-06-15")).await;
            let stored = measurements.list().await.unwrap().len();
            (result, stored)
        });

        let expected_missing: Vec<ObservationKind> = ObservationKind::ALL
            .into_iter()
            .zip(&present)
            .filter(|(_, recorded)| !**recorded)
            .map(|(kind, _)| kind)
            .collect();

        match outcome {
            (Ok(_), stored) => {
                prop_assert!(expected_missing.is_empty());
                prop_assert_eq!(stored, 1);
            }
            (Err(AppError::IncompleteObservationSet { missing, .. }), stored) => {
                prop_assert_eq!(missing, expected_missing);
                prop_assert_eq!(stored, 0);
            }
            (Err(other), _) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }
}
