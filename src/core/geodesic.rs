use crate::core::rules::{Rule, RuleKind};
use crate::domain::model::{validate_radius, ContainmentQuery, Coordinate};
use crate::domain::ports::RuleEvaluator;
use crate::utils::error::Result;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in kilometers between two coordinates on a
/// spherical Earth, using the haversine formula.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let delta_lat = radians(b.latitude() - a.latitude());
    let delta_lon = radians(b.longitude() - a.longitude());

    let h = (delta_lat / 2.0).sin().powi(2)
        + radians(a.latitude()).cos()
            * radians(b.latitude()).cos()
            * (delta_lon / 2.0).sin().powi(2);

    // rounding can push h slightly outside [0, 1]
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().asin()
}

/// Like [`distance_km`] but for raw `(latitude, longitude)` pairs, which are
/// validated before anything is computed.
pub fn distance_km_between(a: (f64, f64), b: (f64, f64)) -> Result<f64> {
    let a = Coordinate::new(a.0, a.1)?;
    let b = Coordinate::new(b.0, b.1)?;
    Ok(distance_km(&a, &b))
}

/// Stateless evaluator for the `Within` and `NotWithin` containment rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeodesicRuleEvaluator;

impl GeodesicRuleEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn distance_km(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        distance_km(a, b)
    }

    /// True when `candidate` is at most `radius_km` from `reference`.
    /// A distance exactly equal to the radius counts as within.
    pub fn within(
        &self,
        candidate: &Coordinate,
        reference: &Coordinate,
        radius_km: f64,
    ) -> Result<bool> {
        let radius_km = validate_radius(radius_km)?;
        Ok(distance_km(reference, candidate) <= radius_km)
    }

    /// True when `candidate` is strictly farther than `radius_km` from
    /// `reference`.
    pub fn not_within(
        &self,
        candidate: &Coordinate,
        reference: &Coordinate,
        radius_km: f64,
    ) -> Result<bool> {
        let radius_km = validate_radius(radius_km)?;
        Ok(distance_km(reference, candidate) > radius_km)
    }

    pub fn contains(&self, query: &ContainmentQuery) -> Result<bool> {
        self.within(&query.candidate, &query.reference, query.radius_km)
    }
}

impl RuleEvaluator for GeodesicRuleEvaluator {
    fn evaluate(&self, rule: &Rule, answer: &Coordinate) -> Result<bool> {
        let inputs = rule.inputs();
        match rule.kind() {
            RuleKind::Within => self.within(answer, &inputs.p, inputs.d),
            RuleKind::NotWithin => self.not_within(answer, &inputs.p, inputs.d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::GradeError;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_identical_points_are_zero_apart() {
        for (lat, lng) in [(0.0, 0.0), (51.5074, -0.1278), (90.0, 180.0), (-89.9, 12.3)] {
            let p = coord(lat, lng);
            let d = distance_km(&p, &p);
            assert!(!d.is_nan());
            assert_eq!(d, 0.0);
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let evaluator = GeodesicRuleEvaluator::new();
        let p = coord(0.0, 0.0);
        let candidate = coord(1.0, 0.0);

        let d = evaluator.distance_km(&p, &candidate);
        assert!((d - 111.19).abs() < 0.01, "Expected ~111.19 km, got {d}");
        assert!(evaluator.within(&candidate, &p, 111.2).unwrap());
        assert!(!evaluator.not_within(&candidate, &p, 111.2).unwrap());
    }

    #[test]
    fn test_london_to_paris() {
        let evaluator = GeodesicRuleEvaluator::new();
        let london = coord(51.5074, -0.1278);
        let paris = coord(48.8566, 2.3522);

        let d = evaluator.distance_km(&london, &paris);
        assert!((d - 343.5).abs() < 1.0, "Expected ~343.5 km, got {d}");
        assert!(!evaluator.within(&paris, &london, 300.0).unwrap());
        assert!(evaluator.not_within(&paris, &london, 300.0).unwrap());
    }

    #[test]
    fn test_boundary_distance_is_within() {
        let evaluator = GeodesicRuleEvaluator::new();
        let p = coord(-33.8688, 151.2093);

        assert!(evaluator.within(&p, &p, 0.0).unwrap());
        assert!(!evaluator.not_within(&p, &p, 0.0).unwrap());

        let far = coord(35.6762, 139.6503);
        let exact = distance_km(&p, &far);
        assert!(evaluator.within(&far, &p, exact).unwrap());
        assert!(!evaluator.not_within(&far, &p, exact).unwrap());
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance_km(&coord(0.0, 0.0), &coord(0.0, 180.0));
        let half_circumference = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!((d - half_circumference).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_latitude_fails_before_computing() {
        let err = distance_km_between((95.0, 0.0), (0.0, 0.0)).unwrap_err();
        assert!(matches!(err, GradeError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        let evaluator = GeodesicRuleEvaluator::new();
        let p = coord(0.0, 0.0);
        assert!(matches!(
            evaluator.within(&p, &p, -1.0),
            Err(GradeError::InvalidRadius { .. })
        ));
        assert!(matches!(
            evaluator.not_within(&p, &p, f64::NAN),
            Err(GradeError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_evaluate_dispatches_on_rule_kind() {
        let evaluator = GeodesicRuleEvaluator::new();
        let london = coord(51.5074, -0.1278);
        let paris = coord(48.8566, 2.3522);

        let within = Rule::new(RuleKind::Within, london, 400.0).unwrap();
        let not_within = Rule::new(RuleKind::NotWithin, london, 400.0).unwrap();

        assert!(evaluator.evaluate(&within, &paris).unwrap());
        assert!(!evaluator.evaluate(&not_within, &paris).unwrap());
    }

    #[test]
    fn test_contains_query() {
        let evaluator = GeodesicRuleEvaluator::new();
        let query = ContainmentQuery::new(coord(0.0, 0.0), 111.2, coord(1.0, 0.0)).unwrap();
        assert!(evaluator.contains(&query).unwrap());
        assert!(ContainmentQuery::new(coord(0.0, 0.0), -0.5, coord(1.0, 0.0)).is_err());
    }
}
