use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    world::{
        fixture::{BasicFixture, SharedFixture},
        model::Model,
        Point,
    },
};

/// Describes an installation as named fixtures and named models, plus the
/// ordered children of the top-level model.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub fixtures: Vec<FixtureDefinition>,
    /// Glob patterns, each match a JSON [`FixtureDefinition`].
    pub fixture_files: Vec<String>,
    pub models: Vec<ModelDefinition>,
    pub root: Vec<ChildRef>,
    /// Directory relative `fixture_files` patterns are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Upper bound on `num_points` for a single fixture definition.
pub const MAX_FIXTURE_POINTS: u32 = 1 << 20;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixtureDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    /// Offset applied to every point of the fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelDefinition {
    pub id: String,
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ChildRef {
    Fixture(String),
    Model(String),
}

impl ModelConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = read_file(path)?;

        debug!("Loaded model description from {}", path.display());

        let mut config = ModelConfig::from_json(&json)?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        Ok(config)
    }

    /// Inline fixtures first, then the matches of each pattern in `fixture_files`.
    /// Relative patterns are taken from the description file's directory when
    /// the description was loaded with [`ModelConfig::from_file`].
    pub fn fixture_definitions(&self) -> Result<Vec<FixtureDefinition>> {
        let mut definitions = self.fixtures.clone();

        for pattern in self.fixture_files.iter() {
            let pattern = self.resolve_pattern(pattern);
            for entry in glob::glob(&pattern)? {
                let path = entry?;
                debug!("Loading fixture from {}", path.display());
                definitions.push(FixtureDefinition::from_file(&path)?);
            }
        }

        Ok(definitions)
    }

    /// Builds the top-level model. Each named model is built once and shared
    /// by every parent that references it.
    pub fn build(&self) -> Result<Model> {
        let mut fixtures: HashMap<String, SharedFixture> = HashMap::new();
        for definition in self.fixture_definitions()? {
            if fixtures.contains_key(&definition.id) {
                return Err(ConfigError::DuplicateFixture(definition.id));
            }

            let fixture = BasicFixture::new(definition.positions()?);
            fixtures.insert(definition.id, fixture.shared());
        }

        let mut models: HashMap<&str, &ModelDefinition> = HashMap::new();
        for definition in self.models.iter() {
            if models.insert(definition.id.as_str(), definition).is_some() {
                return Err(ConfigError::DuplicateModel(definition.id.clone()));
            }
        }

        let mut resolver = ModelResolver {
            fixtures,
            models,
            built: HashMap::new(),
            visiting: vec![],
        };
        let children = resolver.resolve_children(&self.root)?;

        Ok(Model::new(children))
    }

    fn resolve_pattern(&self, pattern: &str) -> String {
        match &self.base_dir {
            Some(base_dir) if Path::new(pattern).is_relative() => {
                let base_dir = glob::Pattern::escape(&base_dir.to_string_lossy());
                Path::new(&base_dir).join(pattern).to_string_lossy().into_owned()
            }
            _ => pattern.to_string(),
        }
    }
}

impl FixtureDefinition {
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&read_file(path)?)?)
    }

    /// Point positions with `position` applied. A declared `num_points` that
    /// disagrees with the listed points places every point at the origin.
    /// `num_points` above [`MAX_FIXTURE_POINTS`] is rejected.
    pub fn positions(&self) -> Result<Vec<Point>> {
        if let Some(num_points) = self.num_points {
            if num_points > MAX_FIXTURE_POINTS {
                return Err(ConfigError::TooManyPoints {
                    id: self.id.clone(),
                    num_points,
                });
            }
        }

        let positions = match (&self.points, self.num_points) {
            (Some(points), None) => points.clone(),
            (Some(points), Some(num_points)) if points.len() == num_points as usize => {
                points.clone()
            }
            (Some(points), Some(num_points)) => {
                warn!(
                    "Fixture {} declares {} points but lists {}, placing all at origin",
                    self.id,
                    num_points,
                    points.len()
                );
                vec![Point::origin(); num_points as usize]
            }
            (None, Some(num_points)) => vec![Point::origin(); num_points as usize],
            (None, None) => vec![],
        };

        Ok(match &self.position {
            Some(offset) => positions.iter().map(|p| p.translate(offset)).collect(),
            None => positions,
        })
    }
}

struct ModelResolver<'a> {
    fixtures: HashMap<String, SharedFixture>,
    models: HashMap<&'a str, &'a ModelDefinition>,
    built: HashMap<String, SharedFixture>,
    /* Models currently being resolved, outermost first. */
    visiting: Vec<String>,
}

impl<'a> ModelResolver<'a> {
    fn resolve_children(&mut self, children: &[ChildRef]) -> Result<Vec<SharedFixture>> {
        let mut resolved: Vec<SharedFixture> = Vec::with_capacity(children.len());

        for child in children.iter() {
            let fixture = match child {
                ChildRef::Fixture(id) => self
                    .fixtures
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownFixture(id.clone()))?,
                ChildRef::Model(id) => self.resolve_model(id)?,
            };
            resolved.push(fixture);
        }

        Ok(resolved)
    }

    fn resolve_model(&mut self, id: &str) -> Result<SharedFixture> {
        if let Some(model) = self.built.get(id) {
            return Ok(Arc::clone(model));
        }

        if self.visiting.iter().any(|visiting| visiting == id) {
            return Err(ConfigError::Cycle(id.to_string()));
        }

        let definition = *self
            .models
            .get(id)
            .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;

        self.visiting.push(id.to_string());
        let children = self.resolve_children(&definition.children)?;
        self.visiting.pop();

        debug!("Resolved model {}", id);

        let model: SharedFixture = Arc::new(Model::new(children));
        self.built.insert(id.to_string(), Arc::clone(&model));

        Ok(model)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTALLATION: &str = r#"{
        "fixtures": [
            { "id": "strip", "points": [{ "x": 0, "y": 0, "z": 0 }, { "x": 2, "y": 0, "z": 0 }] },
            { "id": "pixel", "points": [{ "x": 1, "y": 2, "z": 0 }] }
        ],
        "models": [
            { "id": "wall", "children": [{ "Fixture": "strip" }, { "Fixture": "pixel" }] },
            { "id": "stage", "children": [{ "Model": "wall" }, { "Fixture": "pixel" }] }
        ],
        "root": [{ "Model": "stage" }, { "Model": "wall" }]
    }"#;

    #[test]
    fn builds_nested_models_in_declared_order() {
        let model = ModelConfig::from_json(INSTALLATION).unwrap().build().unwrap();
        let wall = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(1.0, 2.0, 0.0),
        ];
        let mut expected = wall.clone();
        expected.push(Point::new(1.0, 2.0, 0.0));
        expected.extend(wall);

        assert_eq!(model.points(), expected.as_slice());
        assert_eq!(model.fixtures().len(), 2);
        assert_eq!(model.fixture_ranges(), &[0..4, 4..7]);
    }

    #[test]
    fn referenced_model_is_built_once() {
        let config = ModelConfig::from_json(INSTALLATION).unwrap();
        let config = ModelConfig {
            root: vec![ChildRef::Model("wall".to_string()), ChildRef::Model("wall".to_string())],
            ..config
        };
        let model = config.build().unwrap();
        let first = &model.fixtures()[0];
        let second = &model.fixtures()[1];

        assert_eq!(model.size(), 6);
        assert!(std::ptr::eq(
            first.points().as_ptr(),
            second.points().as_ptr()
        ));
    }

    #[test]
    fn rejects_models_that_contain_themselves() {
        let config = ModelConfig::from_json(
            r#"{
                "models": [
                    { "id": "a", "children": [{ "Model": "b" }] },
                    { "id": "b", "children": [{ "Model": "c" }] },
                    { "id": "c", "children": [{ "Model": "a" }] }
                ],
                "root": [{ "Model": "a" }]
            }"#,
        )
        .unwrap();

        match config.build() {
            Err(ConfigError::Cycle(id)) => assert_eq!(id, "a"),
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_references() {
        let config = ModelConfig::from_json(r#"{ "root": [{ "Fixture": "missing" }] }"#).unwrap();
        assert!(matches!(config.build(), Err(ConfigError::UnknownFixture(id)) if id == "missing"));

        let config = ModelConfig::from_json(r#"{ "root": [{ "Model": "missing" }] }"#).unwrap();
        assert!(matches!(config.build(), Err(ConfigError::UnknownModel(id)) if id == "missing"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let config = ModelConfig::from_json(
            r#"{ "fixtures": [{ "id": "a" }, { "id": "a" }] }"#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(ConfigError::DuplicateFixture(id)) if id == "a"));

        let config =
            ModelConfig::from_json(r#"{ "models": [{ "id": "m" }, { "id": "m" }] }"#)
                .unwrap();
        assert!(matches!(config.build(), Err(ConfigError::DuplicateModel(id)) if id == "m"));
    }

    #[test]
    fn mismatched_point_count_falls_back_to_origin() {
        let definition = FixtureDefinition {
            id: "strip".to_string(),
            num_points: Some(3),
            points: Some(vec![Point::new(1.0, 1.0, 1.0)]),
            position: None,
        };

        assert_eq!(definition.positions().unwrap(), vec![Point::origin(); 3]);
    }

    #[test]
    fn oversized_point_count_is_rejected() {
        let definition = FixtureDefinition {
            id: "runaway".to_string(),
            num_points: Some(4_000_000_000),
            points: None,
            position: None,
        };

        match definition.positions() {
            Err(ConfigError::TooManyPoints { id, num_points }) => {
                assert_eq!(id, "runaway");
                assert_eq!(num_points, 4_000_000_000);
            }
            other => panic!("expected too many points, got {:?}", other),
        }

        let config = ModelConfig {
            fixtures: vec![definition],
            ..ModelConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::TooManyPoints { .. })));
    }

    #[test]
    fn relative_patterns_follow_base_dir() {
        let config = ModelConfig {
            fixture_files: vec!["fixtures/*.json".to_string()],
            base_dir: Some(PathBuf::from("/srv/installs/stage")),
            ..ModelConfig::default()
        };

        assert_eq!(
            config.resolve_pattern("fixtures/*.json"),
            "/srv/installs/stage/fixtures/*.json"
        );
        assert_eq!(config.resolve_pattern("/abs/*.json"), "/abs/*.json");
        assert_eq!(
            ModelConfig::default().resolve_pattern("fixtures/*.json"),
            "fixtures/*.json"
        );
    }

    #[test]
    fn position_offsets_every_point() {
        let definition = FixtureDefinition {
            id: "strip".to_string(),
            num_points: None,
            points: Some(vec![Point::new(1.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0)]),
            position: Some(Point::new(0.0, -5.0, 1.0)),
        };

        assert_eq!(
            definition.positions().unwrap(),
            vec![Point::new(1.0, -5.0, 1.0), Point::new(2.0, -5.0, 1.0)]
        );
    }

    #[test]
    fn empty_description_builds_null_model() {
        let model = ModelConfig::default().build().unwrap();

        assert!(model.is_empty());
        assert!(model.fixtures().is_empty());
        assert_eq!(model.centroid(), Point::origin());
    }
}
