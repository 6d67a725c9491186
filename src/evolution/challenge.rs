use crate::{error::Result, phenotype::Phenotype};

/// Scores phenotypes; higher is better.
///
/// Scoring may fail (a malformed candidate, an expression that cannot be
/// evaluated), and the failure aborts the evolution that hit it.
pub trait Challenge<Pheno: Phenotype> {
    fn score(&self, phenotype: &Pheno) -> Result<f64>;
}

impl<Pheno, C> Challenge<Pheno> for &C
where
    Pheno: Phenotype,
    C: Challenge<Pheno> + ?Sized,
{
    fn score(&self, phenotype: &Pheno) -> Result<f64> {
        (**self).score(phenotype)
    }
}
