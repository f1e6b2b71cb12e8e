/// Analysis input form with example presets and submit-time validation
use crate::domain::{example_objects, AnalysisRequest, DebrisObject};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const ALTITUDE_RANGE_KM: (f64, f64) = (200.0, 50_000.0);
pub const TIME_SPAN_RANGE_DAYS: (u32, u32) = (1, 365);
pub const SIMULATION_STEPS_RANGE: (u32, u32) = (100, 10_000);
pub const DEFAULT_TIME_SPAN_DAYS: u32 = 30;
pub const DEFAULT_SIMULATION_STEPS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectField {
    Name,
    AltitudeKm,
    InclinationDeg,
    Eccentricity,
    MassKg,
    CrossSectionM2,
}

impl ObjectField {
    const ALL: [ObjectField; 6] = [
        ObjectField::Name,
        ObjectField::AltitudeKm,
        ObjectField::InclinationDeg,
        ObjectField::Eccentricity,
        ObjectField::MassKg,
        ObjectField::CrossSectionM2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectField::Name => "name",
            ObjectField::AltitudeKm => "altitude_km",
            ObjectField::InclinationDeg => "inclination_deg",
            ObjectField::Eccentricity => "eccentricity",
            ObjectField::MassKg => "mass_kg",
            ObjectField::CrossSectionM2 => "cross_section_m2",
        }
    }

    fn differs(&self, a: &DebrisObject, b: &DebrisObject) -> bool {
        match self {
            ObjectField::Name => a.name != b.name,
            ObjectField::AltitudeKm => a.altitude_km.to_bits() != b.altitude_km.to_bits(),
            ObjectField::InclinationDeg => {
                a.inclination_deg.to_bits() != b.inclination_deg.to_bits()
            }
            ObjectField::Eccentricity => a.eccentricity.to_bits() != b.eccentricity.to_bits(),
            ObjectField::MassKg => a.mass_kg.map(f64::to_bits) != b.mass_kg.map(f64::to_bits),
            ObjectField::CrossSectionM2 => {
                a.cross_section_m2.map(f64::to_bits) != b.cross_section_m2.map(f64::to_bits)
            }
        }
    }
}

/// Key of one entry in the form's error map, rendered as `analysis_name` or `2.altitude_km`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKey {
    AnalysisName,
    Objects,
    TimeSpanDays,
    SimulationSteps,
    Object(usize, ObjectField),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::AnalysisName => write!(f, "analysis_name"),
            FieldKey::Objects => write!(f, "objects"),
            FieldKey::TimeSpanDays => write!(f, "time_span_days"),
            FieldKey::SimulationSteps => write!(f, "simulation_steps"),
            FieldKey::Object(index, field) => write!(f, "{}.{}", index, field.as_str()),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldKey, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.0.keys()
    }

    fn insert(&mut self, key: FieldKey, message: &str) {
        self.0.insert(key, message.to_string());
    }

    fn remove(&mut self, key: &FieldKey) {
        self.0.remove(key);
    }

    /// Drop every per-object entry, used when the whole list is replaced
    fn retain_form_level(&mut self) {
        self.0.retain(|k, _| !matches!(k, FieldKey::Object(..)));
    }

    fn retain_object_level(&mut self) {
        self.0
            .retain(|k, _| matches!(k, FieldKey::Objects | FieldKey::Object(..)));
    }

    /// Shift object entries after `removed` down by one
    fn forget_object(&mut self, removed: usize) {
        let old = std::mem::take(&mut self.0);
        self.0 = old
            .into_iter()
            .filter_map(|(key, msg)| match key {
                FieldKey::Object(i, _) if i == removed => None,
                FieldKey::Object(i, field) if i > removed => {
                    Some((FieldKey::Object(i - 1, field), msg))
                }
                other => Some((other, msg)),
            })
            .collect();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Submitted,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisForm {
    analysis_name: String,
    objects: Vec<DebrisObject>,
    time_span_days: u32,
    simulation_steps: u32,
    errors: FieldErrors,
    phase: FormPhase,
}

impl Default for AnalysisForm {
    fn default() -> Self {
        Self {
            analysis_name: String::new(),
            objects: vec![DebrisObject::default()],
            time_span_days: DEFAULT_TIME_SPAN_DAYS,
            simulation_steps: DEFAULT_SIMULATION_STEPS,
            errors: FieldErrors::default(),
            phase: FormPhase::Editing,
        }
    }
}

impl AnalysisForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analysis_name(&self) -> &str {
        &self.analysis_name
    }

    pub fn objects(&self) -> &[DebrisObject] {
        &self.objects
    }

    pub fn time_span_days(&self) -> u32 {
        self.time_span_days
    }

    pub fn simulation_steps(&self) -> u32 {
        self.simulation_steps
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn set_analysis_name(&mut self, name: impl Into<String>) {
        self.analysis_name = name.into();
        self.errors.remove(&FieldKey::AnalysisName);
        self.phase = FormPhase::Editing;
    }

    pub fn set_parameters(&mut self, time_span_days: Option<u32>, simulation_steps: Option<u32>) {
        if let Some(days) = time_span_days {
            self.time_span_days = days;
            self.errors.remove(&FieldKey::TimeSpanDays);
        }
        if let Some(steps) = simulation_steps {
            self.simulation_steps = steps;
            self.errors.remove(&FieldKey::SimulationSteps);
        }
        self.phase = FormPhase::Editing;
    }

    pub fn add_object(&mut self) {
        let object = DebrisObject {
            name: format!("Debris Object {}", self.objects.len() + 1),
            ..DebrisObject::default()
        };
        self.objects.push(object);
        self.errors.remove(&FieldKey::Objects);
        self.phase = FormPhase::Editing;
    }

    /// Remove the object at `index`; the last remaining object cannot be removed
    pub fn remove_object(&mut self, index: usize) -> bool {
        if self.objects.len() <= 1 || index >= self.objects.len() {
            return false;
        }
        self.objects.remove(index);
        self.errors.forget_object(index);
        self.phase = FormPhase::Editing;
        true
    }

    /// Replace the record at `index`; errors of fields that changed are cleared
    pub fn update_object(&mut self, index: usize, object: DebrisObject) -> bool {
        let Some(current) = self.objects.get(index) else {
            return false;
        };
        for field in ObjectField::ALL {
            if field.differs(current, &object) {
                self.errors.remove(&FieldKey::Object(index, field));
            }
        }
        self.objects[index] = object;
        self.phase = FormPhase::Editing;
        true
    }

    pub fn load_example(&mut self, example_index: usize) -> bool {
        let Some(example) = example_objects().into_iter().nth(example_index) else {
            return false;
        };
        self.analysis_name = format!("Example Analysis: {}", example.name);
        self.objects = vec![example];
        self.after_bulk_replace();
        true
    }

    pub fn load_all_examples(&mut self) {
        self.objects = example_objects();
        self.analysis_name = "Multi-Object Risk Analysis".to_string();
        self.after_bulk_replace();
    }

    fn after_bulk_replace(&mut self) {
        self.errors.retain_form_level();
        self.errors.remove(&FieldKey::AnalysisName);
        self.errors.remove(&FieldKey::Objects);
        self.phase = FormPhase::Editing;
    }

    /// Validate and, if clean, hand back the request to send.
    ///
    /// On failure the error map is replaced and the form stays in `Editing`.
    pub fn submit(&mut self) -> Result<AnalysisRequest, FieldErrors> {
        let errors = self.validate();
        self.errors = errors.clone();
        if !errors.is_empty() {
            self.phase = FormPhase::Editing;
            return Err(errors);
        }
        self.phase = FormPhase::Submitted;
        Ok(self.to_request())
    }

    /// Check only the objects, for registering a stored analysis.
    /// A blank name is allowed there and the parameters are not sent.
    pub fn register(&mut self) -> Result<AnalysisRequest, FieldErrors> {
        let mut errors = self.validate();
        errors.retain_object_level();
        self.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.to_request())
    }

    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            name: self.analysis_name.clone(),
            objects: self.objects.clone(),
            time_span_days: Some(self.time_span_days),
            simulation_steps: Some(self.simulation_steps),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.analysis_name.trim().is_empty() {
            errors.insert(FieldKey::AnalysisName, "Analysis name is required");
        }
        if self.objects.is_empty() {
            errors.insert(FieldKey::Objects, "Please add at least one debris object");
        }
        for (index, object) in self.objects.iter().enumerate() {
            for (field, message) in validate_object(object) {
                errors.insert(FieldKey::Object(index, field), message);
            }
        }
        if !within(self.time_span_days, TIME_SPAN_RANGE_DAYS) {
            errors.insert(
                FieldKey::TimeSpanDays,
                "Time span must be between 1 and 365 days",
            );
        }
        if !within(self.simulation_steps, SIMULATION_STEPS_RANGE) {
            errors.insert(
                FieldKey::SimulationSteps,
                "Simulation steps must be between 100 and 10,000",
            );
        }
        errors
    }
}

/// Field-level checks for one object; NaN and infinities fail every range
pub fn validate_object(object: &DebrisObject) -> Vec<(ObjectField, &'static str)> {
    let mut problems = Vec::new();

    if object.name.trim().is_empty() {
        problems.push((ObjectField::Name, "Object name is required"));
    }
    let (alt_min, alt_max) = ALTITUDE_RANGE_KM;
    if !(alt_min..=alt_max).contains(&object.altitude_km) {
        problems.push((
            ObjectField::AltitudeKm,
            "Altitude must be between 200 and 50,000 km",
        ));
    }
    if !(0.0..=180.0).contains(&object.inclination_deg) {
        problems.push((
            ObjectField::InclinationDeg,
            "Inclination must be between 0 and 180 degrees",
        ));
    }
    if !(0.0..1.0).contains(&object.eccentricity) {
        problems.push((
            ObjectField::Eccentricity,
            "Eccentricity must be between 0 and 1",
        ));
    }
    if matches!(object.mass_kg, Some(m) if !(m > 0.0 && m.is_finite())) {
        problems.push((ObjectField::MassKg, "Mass must be positive"));
    }
    if matches!(object.cross_section_m2, Some(a) if !(a > 0.0 && a.is_finite())) {
        problems.push((ObjectField::CrossSectionM2, "Cross section must be positive"));
    }
    problems
}

fn within(value: u32, (min, max): (u32, u32)) -> bool {
    (min..=max).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> AnalysisForm {
        let mut form = AnalysisForm::new();
        form.set_analysis_name("LEO sweep");
        form
    }

    #[test]
    fn test_valid_form_submits_once() {
        let mut form = valid_form();
        let request = form.submit().expect("valid form");
        assert_eq!(request.name, "LEO sweep");
        assert_eq!(request.objects.len(), 1);
        assert_eq!(request.time_span_days, Some(30));
        assert_eq!(request.simulation_steps, Some(1000));
        assert_eq!(form.phase(), FormPhase::Submitted);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_blank_name_blocks_submit() {
        let mut form = AnalysisForm::new();
        form.set_analysis_name("   ");
        let errors = form.submit().unwrap_err();
        assert_eq!(
            errors.get(&FieldKey::AnalysisName),
            Some("Analysis name is required")
        );
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_out_of_range_fields_are_keyed() {
        let mut form = valid_form();
        form.update_object(
            0,
            DebrisObject {
                name: "Bad".to_string(),
                altitude_km: 150.0,
                inclination_deg: 181.0,
                eccentricity: 1.0,
                mass_kg: Some(0.0),
                cross_section_m2: Some(-2.0),
            },
        );
        let errors = form.submit().unwrap_err();
        let keys: Vec<String> = errors.keys().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "0.altitude_km",
                "0.inclination_deg",
                "0.eccentricity",
                "0.mass_kg",
                "0.cross_section_m2"
            ]
        );
    }

    #[test]
    fn test_altitude_bounds_are_inclusive() {
        for altitude in [200.0, 50_000.0] {
            let object = DebrisObject {
                altitude_km: altitude,
                ..DebrisObject::default()
            };
            assert!(validate_object(&object).is_empty(), "{}", altitude);
        }
        let too_high = DebrisObject {
            altitude_km: 50_000.5,
            ..DebrisObject::default()
        };
        assert_eq!(validate_object(&too_high)[0].0, ObjectField::AltitudeKm);
    }

    #[test]
    fn test_nan_fails_range_checks() {
        let object = DebrisObject {
            eccentricity: f64::NAN,
            mass_kg: Some(f64::NAN),
            ..DebrisObject::default()
        };
        let fields: Vec<ObjectField> = validate_object(&object).into_iter().map(|p| p.0).collect();
        assert_eq!(fields, vec![ObjectField::Eccentricity, ObjectField::MassKg]);
    }

    #[test]
    fn test_editing_a_field_clears_only_its_error() {
        let mut form = valid_form();
        let bad = DebrisObject {
            altitude_km: 10.0,
            inclination_deg: -1.0,
            ..DebrisObject::default()
        };
        form.update_object(0, bad.clone());
        assert!(form.submit().is_err());

        form.update_object(
            0,
            DebrisObject {
                altitude_km: 500.0,
                ..bad
            },
        );
        assert!(!form
            .errors()
            .contains(&FieldKey::Object(0, ObjectField::AltitudeKm)));
        assert!(form
            .errors()
            .contains(&FieldKey::Object(0, ObjectField::InclinationDeg)));
    }

    #[test]
    fn test_register_allows_blank_name() {
        let mut form = AnalysisForm::new();
        form.set_parameters(Some(0), None);
        let request = form.register().unwrap();
        assert_eq!(request.name, "");
        assert_eq!(request.objects.len(), 1);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_register_still_checks_objects() {
        let mut form = AnalysisForm::new();
        let mut object = form.objects()[0].clone();
        object.altitude_km = 50.0;
        form.update_object(0, object);
        let errors = form.register().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(&FieldKey::Object(0, ObjectField::AltitudeKm)));
    }

    #[test]
    fn test_load_all_examples() {
        let mut form = AnalysisForm::new();
        form.load_all_examples();
        assert_eq!(form.objects(), example_objects().as_slice());
        assert_eq!(form.analysis_name(), "Multi-Object Risk Analysis");
    }

    #[test]
    fn test_load_single_example() {
        let mut form = AnalysisForm::new();
        assert!(form.load_example(2));
        assert_eq!(form.objects().len(), 1);
        assert_eq!(form.analysis_name(), "Example Analysis: Rocket Upper Stage");
        assert!(!form.load_example(3));
    }

    #[test]
    fn test_last_object_cannot_be_removed() {
        let mut form = AnalysisForm::new();
        assert!(!form.remove_object(0));
        form.add_object();
        assert_eq!(form.objects()[1].name, "Debris Object 2");
        assert!(form.remove_object(0));
        assert_eq!(form.objects().len(), 1);
    }

    #[test]
    fn test_removing_object_renumbers_errors() {
        let mut form = valid_form();
        form.add_object();
        form.update_object(
            1,
            DebrisObject {
                name: String::new(),
                ..DebrisObject::default()
            },
        );
        assert!(form.submit().is_err());
        form.remove_object(0);
        assert!(form
            .errors()
            .contains(&FieldKey::Object(0, ObjectField::Name)));
    }

    #[test]
    fn test_parameter_bounds() {
        let mut form = valid_form();
        form.set_parameters(Some(0), Some(50));
        let errors = form.submit().unwrap_err();
        assert!(errors.contains(&FieldKey::TimeSpanDays));
        assert!(errors.contains(&FieldKey::SimulationSteps));
    }

    #[test]
    fn test_error_map_serializes_with_string_keys() {
        let mut form = AnalysisForm::new();
        let errors = form.submit().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["analysis_name"], "Analysis name is required");
    }
}
