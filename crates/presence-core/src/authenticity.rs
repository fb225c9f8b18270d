//! Fake-location detection
//!
//! A location fix is run through an ordered list of layers. The first layer
//! that fires decides the verdict and nothing after it is evaluated. This is
//! a heuristic: false positives and negatives are expected.
//!
//! | Layer | Fires when | Confidence |
//! |---|---|---|
//! | [`Layer::MockProvider`] | the OS flagged the fix as mocked | 100 |
//! | [`Layer::SpoofingApp`] | a known fake-GPS app is installed | 90 |
//! | [`Layer::AccuracyTooPrecise`] | accuracy `< 1.0` m | 75 |
//! | [`Layer::AccuracyTooPoor`] | accuracy `> 500.0` m | 60 |
//! | [`Layer::AccuracyMissing`] | no accuracy reported | 50 |
//! | [`Layer::UnrealisticSpeed`] | speed `> 50` m/s | 80 |
//! | [`Layer::AltitudeAnomaly`] | altitude `< -100` m or `> 5000` m | 70 |

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::location::LocationFix;

/// Package identifiers of widely used fake-GPS apps
pub const KNOWN_SPOOFING_APPS: [&str; 9] = [
    "com.lexa.fakegps",
    "com.incorporateapps.fakegps.fre",
    "com.blogspot.newapphorizons.fakegps",
    "com.theappninjas.fakegpsjoystick",
    "com.fly.gps",
    "com.fake.location",
    "com.gps.mock",
    "com.route4me.routeoptimizer",
    "com.fakegps.mock",
];

/// Detection thresholds
pub mod thresholds {
    /// Accuracy below this is too good for a consumer GNSS receiver
    pub const MIN_ACCURACY_M: f64 = 1.0;
    /// Accuracy above this is not a usable fix
    pub const MAX_ACCURACY_M: f64 = 500.0;
    /// 180 km/h
    pub const MAX_SPEED_MPS: f64 = 50.0;
    pub const MIN_ALTITUDE_M: f64 = -100.0;
    pub const MAX_ALTITUDE_M: f64 = 5000.0;
}

/// Read access to the identifiers of packages installed on the device.
///
/// Implementations must give a stable answer for the duration of one
/// evaluation.
pub trait PackageLookup {
    fn is_installed(&self, package: &str) -> bool;
}

/// A device on which nothing from the block list is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPackages;

impl PackageLookup for NoPackages {
    fn is_installed(&self, _package: &str) -> bool {
        false
    }
}

impl PackageLookup for HashSet<String> {
    fn is_installed(&self, package: &str) -> bool {
        self.contains(package)
    }
}

impl PackageLookup for BTreeSet<String> {
    fn is_installed(&self, package: &str) -> bool {
        self.contains(package)
    }
}

impl PackageLookup for [String] {
    fn is_installed(&self, package: &str) -> bool {
        self.iter().any(|p| p == package)
    }
}

impl PackageLookup for Vec<String> {
    fn is_installed(&self, package: &str) -> bool {
        self.as_slice().is_installed(package)
    }
}

impl PackageLookup for [&str] {
    fn is_installed(&self, package: &str) -> bool {
        self.iter().any(|p| *p == package)
    }
}

impl<T: PackageLookup + ?Sized> PackageLookup for &T {
    fn is_installed(&self, package: &str) -> bool {
        (**self).is_installed(package)
    }
}

/// Block list of fake-GPS app package identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpoofingAppList(Vec<String>);

impl Default for SpoofingAppList {
    fn default() -> Self {
        Self(KNOWN_SPOOFING_APPS.iter().map(|s| s.to_string()).collect())
    }
}

impl SpoofingAppList {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(packages.into_iter().map(Into::into).collect())
    }

    pub fn packages(&self) -> &[String] {
        &self.0
    }

    /// First block-listed package present on the device, in list order
    pub fn first_installed<'a>(&'a self, device: &impl PackageLookup) -> Option<&'a str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|pkg| device.is_installed(pkg))
    }
}

/// Detection layer that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    MockProvider,
    SpoofingApp,
    AccuracyTooPrecise,
    AccuracyTooPoor,
    AccuracyMissing,
    UnrealisticSpeed,
    AltitudeAnomaly,
}

impl Layer {
    /// Evaluation order
    pub const ALL: [Layer; 7] = [
        Layer::MockProvider,
        Layer::SpoofingApp,
        Layer::AccuracyTooPrecise,
        Layer::AccuracyTooPoor,
        Layer::AccuracyMissing,
        Layer::UnrealisticSpeed,
        Layer::AltitudeAnomaly,
    ];

    pub fn confidence(self) -> u8 {
        match self {
            Layer::MockProvider => 100,
            Layer::SpoofingApp => 90,
            Layer::AccuracyTooPrecise => 75,
            Layer::AccuracyTooPoor => 60,
            Layer::AccuracyMissing => 50,
            Layer::UnrealisticSpeed => 80,
            Layer::AltitudeAnomaly => 70,
        }
    }

    /// Reason string if this layer fires for `fix`
    fn check(
        self,
        fix: &LocationFix,
        apps: &SpoofingAppList,
        device: &impl PackageLookup,
    ) -> Option<String> {
        match self {
            Layer::MockProvider => fix
                .is_from_mock_provider
                .then(|| "Detected as a mock location (fake location)".to_string()),
            Layer::SpoofingApp => apps
                .first_installed(device)
                .map(|pkg| format!("Fake GPS app detected installed on the device ({pkg})")),
            Layer::AccuracyTooPrecise => fix
                .accuracy
                .filter(|&acc| acc < thresholds::MIN_ACCURACY_M)
                .map(|acc| format!("Unnatural GPS accuracy ({acc:.2}m), likely a fake location")),
            Layer::AccuracyTooPoor => fix
                .accuracy
                .filter(|&acc| acc > thresholds::MAX_ACCURACY_M)
                .map(|acc| format!("Invalid GPS signal (accuracy {}m)", acc.round() as i64)),
            Layer::AccuracyMissing => fix
                .accuracy
                .is_none()
                .then(|| "GPS accuracy data is not available".to_string()),
            Layer::UnrealisticSpeed => fix
                .speed
                .filter(|&speed| speed > thresholds::MAX_SPEED_MPS)
                .map(|speed| format!("Unrealistic movement speed ({} m/s)", speed.round() as i64)),
            Layer::AltitudeAnomaly => fix
                .altitude
                .filter(|&alt| alt < thresholds::MIN_ALTITUDE_M || alt > thresholds::MAX_ALTITUDE_M)
                .map(|alt| format!("Invalid altitude ({} m above sea level)", alt.round() as i64)),
        }
    }
}

/// Outcome of a fake-location evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityVerdict {
    pub is_fake: bool,
    /// Empty when the fix looks genuine
    pub reason: String,
    /// Heuristic certainty in 0..=100, not a calibrated probability
    pub confidence: u8,
    /// Layer that fired, if any
    pub layer: Option<Layer>,
}

impl AuthenticityVerdict {
    pub fn genuine() -> Self {
        Self {
            is_fake: false,
            reason: String::new(),
            confidence: 0,
            layer: None,
        }
    }

    fn fake(layer: Layer, reason: String) -> Self {
        Self {
            is_fake: true,
            reason,
            confidence: layer.confidence(),
            layer: Some(layer),
        }
    }
}

/// Estimate whether `fix` was spoofed.
///
/// Never fails: when every signal looks plausible the verdict is
/// `is_fake = false` with confidence 0.
pub fn detect_fake_location(
    fix: &LocationFix,
    apps: &SpoofingAppList,
    device: &impl PackageLookup,
) -> AuthenticityVerdict {
    let verdict = Layer::ALL
        .iter()
        .find_map(|&layer| {
            layer
                .check(fix, apps, device)
                .map(|reason| AuthenticityVerdict::fake(layer, reason))
        })
        .unwrap_or_else(AuthenticityVerdict::genuine);

    if let Some(layer) = verdict.layer {
        debug!(
            ?layer,
            confidence = verdict.confidence,
            reason = %verdict.reason,
            "Location fix flagged as fake"
        );
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::GeoPoint;

    fn clean_fix() -> LocationFix {
        LocationFix::new(GeoPoint::new(-6.360427, 107.095709))
            .with_accuracy(10.0)
            .with_speed(1.0)
            .with_altitude(50.0)
    }

    fn detect(fix: &LocationFix) -> AuthenticityVerdict {
        detect_fake_location(fix, &SpoofingAppList::default(), &NoPackages)
    }

    #[test]
    fn test_clean_fix_is_genuine() {
        let verdict = detect(&clean_fix());
        assert!(!verdict.is_fake);
        assert_eq!(verdict.confidence, 0);
        assert!(verdict.reason.is_empty());
        assert_eq!(verdict.layer, None);
    }

    #[test]
    fn test_mock_provider_wins_over_everything() {
        let fix = LocationFix::new(GeoPoint::new(0.0, 0.0))
            .from_mock_provider(true)
            .with_speed(120.0)
            .with_altitude(9000.0);
        let device = vec!["com.lexa.fakegps".to_string()];
        let verdict = detect_fake_location(&fix, &SpoofingAppList::default(), &device);
        assert!(verdict.is_fake);
        assert_eq!(verdict.confidence, 100);
        assert_eq!(verdict.layer, Some(Layer::MockProvider));
    }

    #[test]
    fn test_installed_spoofing_app() {
        let device: HashSet<String> = ["com.example.notes", "com.fly.gps"]
            .into_iter()
            .map(String::from)
            .collect();
        let verdict = detect_fake_location(&clean_fix(), &SpoofingAppList::default(), &device);
        assert_eq!(verdict.confidence, 90);
        assert_eq!(verdict.layer, Some(Layer::SpoofingApp));
        assert!(verdict.reason.contains("com.fly.gps"));
    }

    #[test]
    fn test_custom_block_list() {
        let apps = SpoofingAppList::new(["org.example.teleport"]);
        let device: &[&str] = &["com.lexa.fakegps", "org.example.teleport"];
        let verdict = detect_fake_location(&clean_fix(), &apps, &device);
        assert_eq!(verdict.layer, Some(Layer::SpoofingApp));
        assert!(verdict.reason.contains("org.example.teleport"));
    }

    #[test]
    fn test_accuracy_thresholds_are_strict() {
        for accuracy in [1.0, 500.0] {
            let verdict = detect(&clean_fix().with_accuracy(accuracy));
            assert!(!verdict.is_fake, "accuracy {accuracy} should pass");
        }

        let precise = detect(&clean_fix().with_accuracy(0.99));
        assert_eq!(precise.layer, Some(Layer::AccuracyTooPrecise));
        assert_eq!(precise.confidence, 75);
        assert!(precise.reason.contains("0.99m"));

        let poor = detect(&clean_fix().with_accuracy(500.01));
        assert_eq!(poor.layer, Some(Layer::AccuracyTooPoor));
        assert_eq!(poor.confidence, 60);
        assert!(poor.reason.contains("500m"));
    }

    #[test]
    fn test_missing_readings_flag_accuracy_only() {
        let verdict = detect(&LocationFix::new(GeoPoint::new(0.0, 0.0)));
        assert!(verdict.is_fake);
        assert_eq!(verdict.confidence, 50);
        assert_eq!(verdict.layer, Some(Layer::AccuracyMissing));
    }

    #[test]
    fn test_accuracy_outranks_speed() {
        let fix = clean_fix().with_accuracy(0.5).with_speed(80.0);
        assert_eq!(detect(&fix).layer, Some(Layer::AccuracyTooPrecise));
    }

    #[test]
    fn test_unrealistic_speed() {
        let verdict = detect(&clean_fix().with_speed(50.5));
        assert_eq!(verdict.layer, Some(Layer::UnrealisticSpeed));
        assert_eq!(verdict.confidence, 80);
        assert!(verdict.reason.contains("51 m/s"));
        assert!(!detect(&clean_fix().with_speed(50.0)).is_fake);
    }

    #[test]
    fn test_altitude_anomaly() {
        for altitude in [-100.5, 5000.5] {
            let verdict = detect(&clean_fix().with_altitude(altitude));
            assert_eq!(verdict.layer, Some(Layer::AltitudeAnomaly));
            assert_eq!(verdict.confidence, 70);
        }
        assert!(!detect(&clean_fix().with_altitude(-100.0)).is_fake);
        assert!(!detect(&clean_fix().with_altitude(5000.0)).is_fake);
    }

    #[test]
    fn test_absent_speed_and_altitude_are_skipped() {
        let fix = LocationFix::new(GeoPoint::new(0.0, 0.0)).with_accuracy(15.0);
        assert_eq!(detect(&fix), AuthenticityVerdict::genuine());
    }

    #[test]
    fn test_default_block_list_has_known_apps() {
        let apps = SpoofingAppList::default();
        assert_eq!(apps.packages().len(), KNOWN_SPOOFING_APPS.len());
        assert_eq!(apps.packages()[0], "com.lexa.fakegps");
    }
}
