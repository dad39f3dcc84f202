// Market/economic feature engine
pub mod features;

// Shared min-max normalization helper
pub mod normalize;

// Z-score outlier scoring primitive
pub mod outliers;

// News sentiment aggregation
pub mod sentiment;
