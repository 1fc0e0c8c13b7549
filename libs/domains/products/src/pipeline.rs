//! Typed aggregation pipelines
//!
//! Stages are plain values that can be validated and inspected in tests; they
//! are rendered to BSON only when handed to the database.
//!
//! ```
//! use domain_products::pipeline::{Accumulator, Expr, GroupStage, Pipeline, ProjectStage};
//!
//! let pipeline = Pipeline::new()
//!     .group(GroupStage::by(Expr::field("brand")).with("totalStock", Accumulator::sum("stock")))
//!     .project(ProjectStage::new().exclude("_id").rename("brand", "_id").include("totalStock"));
//!
//! assert!(pipeline.validate().is_ok());
//! assert_eq!(pipeline.to_documents().len(), 2);
//! ```

use std::collections::HashSet;

use mongodb::bson::{Bson, Document, doc};
use thiserror::Error;

use crate::query::{SortDirection, SortSpec};

/// Price above which an item counts as expensive (strictly greater)
pub const EXPENSIVE_PRICE_THRESHOLD: i32 = 500;
/// Number of items returned by the best-rated-expensive pipeline
pub const BEST_RATED_LIMIT: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("pipeline has no stages")]
    Empty,

    #[error("stage {stage}: limit must be positive, got {limit}")]
    InvalidLimit { stage: usize, limit: i64 },

    #[error("stage {stage}: invalid output field name '{name}'")]
    InvalidFieldName { stage: usize, name: String },

    #[error("stage {stage}: output field '{name}' defined more than once")]
    DuplicateField { stage: usize, name: String },

    #[error("stage {stage}: sort needs at least one key")]
    EmptySort { stage: usize },

    #[error("grouped results must end with a projection that excludes _id")]
    GroupKeyExposed,
}

/// Value expression used inside group and project stages
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Path of a field in the input document, without the leading `$`
    Field(String),
    Literal(Bson),
    Multiply(Vec<Expr>),
    Round { value: Box<Expr>, places: i32 },
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    pub fn multiply(factors: impl IntoIterator<Item = Expr>) -> Self {
        Self::Multiply(factors.into_iter().collect())
    }

    pub fn round(value: Expr, places: i32) -> Self {
        Self::Round {
            value: Box::new(value),
            places,
        }
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            Self::Field(path) => Bson::String(format!("${path}")),
            Self::Literal(value) => value.clone(),
            Self::Multiply(factors) => {
                let factors: Vec<Bson> = factors.iter().map(Expr::to_bson).collect();
                Bson::Document(doc! { "$multiply": factors })
            }
            Self::Round { value, places } => {
                let args = vec![value.to_bson(), Bson::Int32(*places)];
                Bson::Document(doc! { "$round": args })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Number of documents in the group
    Count,
    Sum(Expr),
    Avg(Expr),
    Max(Expr),
    Min(Expr),
}

impl Accumulator {
    pub fn sum(field: &str) -> Self {
        Self::Sum(Expr::field(field))
    }

    pub fn avg(field: &str) -> Self {
        Self::Avg(Expr::field(field))
    }

    pub fn max(field: &str) -> Self {
        Self::Max(Expr::field(field))
    }

    pub fn min(field: &str) -> Self {
        Self::Min(Expr::field(field))
    }

    fn to_bson(&self) -> Bson {
        let (operator, operand) = match self {
            Self::Count => ("$sum", Bson::Int32(1)),
            Self::Sum(expr) => ("$sum", expr.to_bson()),
            Self::Avg(expr) => ("$avg", expr.to_bson()),
            Self::Max(expr) => ("$max", expr.to_bson()),
            Self::Min(expr) => ("$min", expr.to_bson()),
        };
        let mut accumulator = Document::new();
        accumulator.insert(operator, operand);
        Bson::Document(accumulator)
    }
}

/// `$group`: the key becomes `_id` of every output row
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStage {
    pub key: Expr,
    pub accumulators: Vec<(String, Accumulator)>,
}

impl GroupStage {
    pub fn by(key: Expr) -> Self {
        Self {
            key,
            accumulators: Vec::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, accumulator: Accumulator) -> Self {
        self.accumulators.push((name.into(), accumulator));
        self
    }

    fn to_document(&self) -> Document {
        let mut group = doc! { "_id": self.key.to_bson() };
        for (name, accumulator) in &self.accumulators {
            group.insert(name.as_str(), accumulator.to_bson());
        }
        group
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Include,
    Exclude,
    Computed(Expr),
}

impl Projection {
    fn to_bson(&self) -> Bson {
        match self {
            Self::Include => Bson::Int32(1),
            Self::Exclude => Bson::Int32(0),
            Self::Computed(expr) => expr.to_bson(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStage {
    pub fields: Vec<(String, Projection)>,
}

impl ProjectStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(self, name: impl Into<String>) -> Self {
        self.field(name, Projection::Include)
    }

    pub fn exclude(self, name: impl Into<String>) -> Self {
        self.field(name, Projection::Exclude)
    }

    /// Output `name` with the value of the input field `from`
    pub fn rename(self, name: impl Into<String>, from: impl Into<String>) -> Self {
        self.field(name, Projection::Computed(Expr::Field(from.into())))
    }

    pub fn computed(self, name: impl Into<String>, expr: Expr) -> Self {
        self.field(name, Projection::Computed(expr))
    }

    fn field(mut self, name: impl Into<String>, projection: Projection) -> Self {
        self.fields.push((name.into(), projection));
        self
    }

    fn excludes_id(&self) -> bool {
        self.fields
            .iter()
            .any(|(name, projection)| name == "_id" && *projection == Projection::Exclude)
    }

    fn to_document(&self) -> Document {
        let mut project = Document::new();
        for (name, projection) in &self.fields {
            project.insert(name.as_str(), projection.to_bson());
        }
        project
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Document),
    Group(GroupStage),
    Sort(Vec<SortSpec>),
    Limit(i64),
    Project(ProjectStage),
}

impl Stage {
    pub fn to_document(&self) -> Document {
        match self {
            Self::Match(filter) => doc! { "$match": filter.clone() },
            Self::Group(group) => doc! { "$group": group.to_document() },
            Self::Sort(keys) => {
                let mut sort = Document::new();
                for key in keys {
                    sort.insert(key.field.as_str(), key.direction.as_i32());
                }
                doc! { "$sort": sort }
            }
            Self::Limit(limit) => doc! { "$limit": Bson::Int64(*limit) },
            Self::Project(project) => doc! { "$project": project.to_document() },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Match(_) => "$match",
            Self::Group(_) => "$group",
            Self::Sort(_) => "$sort",
            Self::Limit(_) => "$limit",
            Self::Project(_) => "$project",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn filter(self, filter: Document) -> Self {
        self.stage(Stage::Match(filter))
    }

    pub fn group(self, group: GroupStage) -> Self {
        self.stage(Stage::Group(group))
    }

    pub fn sort_by(self, field: &str, direction: SortDirection) -> Self {
        self.stage(Stage::Sort(vec![SortSpec::new(field, direction)]))
    }

    pub fn limit(self, limit: i64) -> Self {
        self.stage(Stage::Limit(limit))
    }

    pub fn project(self, project: ProjectStage) -> Self {
        self.stage(Stage::Project(project))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage names in order, e.g. `["$group", "$sort", "$project"]`
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }

    /// Check the pipeline is well formed before it is sent anywhere.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::Empty);
        }

        for (index, stage) in self.stages.iter().enumerate() {
            match stage {
                Stage::Limit(limit) if *limit <= 0 => {
                    return Err(PipelineError::InvalidLimit {
                        stage: index,
                        limit: *limit,
                    });
                }
                Stage::Sort(keys) if keys.is_empty() => {
                    return Err(PipelineError::EmptySort { stage: index });
                }
                Stage::Group(group) => {
                    check_output_names(
                        index,
                        group.accumulators.iter().map(|(name, _)| name.as_str()),
                        false,
                    )?;
                }
                Stage::Project(project) => {
                    check_output_names(
                        index,
                        project.fields.iter().map(|(name, _)| name.as_str()),
                        true,
                    )?;
                }
                _ => {}
            }
        }

        let groups = self
            .stages
            .iter()
            .any(|stage| matches!(stage, Stage::Group(_)));
        if groups {
            match self.stages.last() {
                Some(Stage::Project(project)) if project.excludes_id() => {}
                _ => return Err(PipelineError::GroupKeyExposed),
            }
        }

        Ok(())
    }
}

fn check_output_names<'a>(
    stage: usize,
    names: impl Iterator<Item = &'a str>,
    allow_id: bool,
) -> Result<(), PipelineError> {
    let mut seen = HashSet::new();
    for name in names {
        let reserved = name == "_id" && !allow_id;
        if name.is_empty() || name.starts_with('$') || name.contains('.') || reserved {
            return Err(PipelineError::InvalidFieldName {
                stage,
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(PipelineError::DuplicateField {
                stage,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Per-category count and price statistics, most expensive average first.
///
/// Rows: `{ categoryName, totalProducts, averagePrice (2 decimals), maxPrice, minPrice }`
pub fn category_stats() -> Pipeline {
    Pipeline::new()
        .group(
            GroupStage::by(Expr::field("category"))
                .with("totalProducts", Accumulator::Count)
                .with("averagePrice", Accumulator::avg("price"))
                .with("maxPrice", Accumulator::max("price"))
                .with("minPrice", Accumulator::min("price")),
        )
        .sort_by("averagePrice", SortDirection::Descending)
        .project(
            ProjectStage::new()
                .exclude("_id")
                .rename("categoryName", "_id")
                .include("totalProducts")
                .computed("averagePrice", Expr::round(Expr::field("averagePrice"), 2))
                .include("maxPrice")
                .include("minPrice"),
        )
}

/// Top rated items priced above [`EXPENSIVE_PRICE_THRESHOLD`].
///
/// Rows: `{ title, price, rating }`
pub fn best_rated_expensive() -> Pipeline {
    Pipeline::new()
        .filter(doc! { "price": { "$gt": EXPENSIVE_PRICE_THRESHOLD } })
        .sort_by("rating", SortDirection::Descending)
        .limit(BEST_RATED_LIMIT)
        .project(
            ProjectStage::new()
                .exclude("_id")
                .include("title")
                .include("price")
                .include("rating"),
        )
}

/// Units in stock and stock value (`price * stock`) per brand, in no particular order.
///
/// Rows: `{ brand, totalStock, totalValue }`
pub fn brand_stats() -> Pipeline {
    Pipeline::new()
        .group(
            GroupStage::by(Expr::field("brand"))
                .with("totalStock", Accumulator::sum("stock"))
                .with(
                    "totalValue",
                    Accumulator::Sum(Expr::multiply([
                        Expr::field("price"),
                        Expr::field("stock"),
                    ])),
                ),
        )
        .project(
            ProjectStage::new()
                .exclude("_id")
                .rename("brand", "_id")
                .include("totalStock")
                .include("totalValue"),
        )
}
