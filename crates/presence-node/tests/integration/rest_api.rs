//! REST API payload tests
//!
//! The handlers serialize presence-core types directly, so these tests
//! verify the wire format of those types as clients see it.

use serde_json::{json, Value};

use presence_core::presence::{parse_arrival_time, PresenceAttempt};
use presence_core::{
    AuthenticityVerdict, GeoPoint, LocationFix, NoPackages, OfficeGeofence, PresenceGate,
    SpoofingAppList,
};

fn gate() -> PresenceGate {
    PresenceGate::new(
        OfficeGeofence::new(GeoPoint::new(-6.360427, 107.095709), 1000.0, "SMK Al-Luthfah"),
        SpoofingAppList::default(),
    )
}

/// Test expected format for GET /api/geofence response
#[test]
fn test_geofence_response_format() {
    let response = serde_json::to_value(gate().geofence()).unwrap();

    assert!(response["center"]["latitude"].is_number());
    assert!(response["center"]["longitude"].is_number());
    assert_eq!(response["max_radius_m"], 1000.0);
    assert_eq!(response["name"], "SMK Al-Luthfah");
}

/// Test expected format for POST /api/geofence/check response
#[test]
fn test_geofence_check_response_format() {
    let check = gate().geofence().check(&GeoPoint::new(-6.2, 106.8));
    let response = serde_json::to_value(&check).unwrap();

    assert_eq!(response["valid"], false);
    assert!(response["distance_m"].as_f64().unwrap() > 1000.0);
    assert!(response["message"]
        .as_str()
        .unwrap()
        .starts_with("Location too far!"));
}

/// Test that a client fix body with only some readings is accepted
#[test]
fn test_authenticity_request_fix_format() {
    let body = json!({
        "latitude": -6.3605,
        "longitude": 107.0957,
        "accuracy": 6.5,
        "is_from_mock_provider": false
    });
    let fix: LocationFix = serde_json::from_value(body).unwrap();

    assert_eq!(fix.accuracy, Some(6.5));
    assert_eq!(fix.speed, None);
    assert_eq!(fix.altitude, None);
}

/// Test expected format for POST /api/authenticity response
#[test]
fn test_authenticity_response_format() {
    let fix = LocationFix::new(GeoPoint::new(-6.3605, 107.0957)).with_accuracy(700.0);
    let verdict = gate().verify_fix(&fix, &NoPackages);
    let response = serde_json::to_value(&verdict).unwrap();

    assert_eq!(response["is_fake"], true);
    assert_eq!(response["confidence"], 60);
    assert_eq!(response["layer"], "accuracy_too_poor");
    assert_eq!(response["reason"], "Invalid GPS signal (accuracy 700m)");

    let genuine = serde_json::to_value(AuthenticityVerdict::genuine()).unwrap();
    assert_eq!(genuine["reason"], "");
    assert_eq!(genuine["layer"], Value::Null);
}

/// Test expected format for POST /api/presence response variants
#[test]
fn test_presence_response_status_tags() {
    let attempt = |point: GeoPoint, fix: Option<LocationFix>| PresenceAttempt {
        member_id: 1,
        arrival_time: parse_arrival_time("08:10:00").unwrap(),
        point,
        fix,
    };
    let near = GeoPoint::new(-6.3605, 107.0957);
    let far = GeoPoint::new(-6.2, 106.8);

    let evaluate = |attempt: PresenceAttempt| {
        serde_json::to_value(gate().evaluate(&attempt, &NoPackages)).unwrap()
    };

    let out_of_range = evaluate(attempt(far, None));
    assert_eq!(out_of_range["status"], "out_of_range");
    assert!(out_of_range["geofence"].is_object());

    let mocked = LocationFix::new(near).from_mock_provider(true);
    let fake = evaluate(attempt(near, Some(mocked)));
    assert_eq!(fake["status"], "fake_location");
    assert_eq!(fake["verdict"]["confidence"], 100);

    let accepted = evaluate(attempt(near, None));
    assert_eq!(accepted["status"], "accepted");
    assert_eq!(accepted["request"]["member_id"], 1);
    assert_eq!(accepted["request"]["gps_accuracy"], Value::Null);
}
