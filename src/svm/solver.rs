//! Training backends.

use super::model::{SvmModel, SvmParameters, SvmProblem};
use crate::Result;

/// Solves an SVM training problem.
///
/// Quadratic-program optimisers (libSVM and friends) plug in here. The solver
/// owns no state between calls.
pub trait SvmSolver: Send {
    /// Train a model.
    ///
    /// # Arguments
    /// * `problem` - Labelled examples, both classes present
    /// * `parameters` - Kernel, penalty and class weights
    ///
    /// # Returns
    /// The trained model, or an error when the parameters or problem are malformed.
    fn solve(&self, problem: &SvmProblem, parameters: &SvmParameters) -> Result<SvmModel>;
}

/// Baseline solver placing the decision boundary midway between the class
/// means in kernel feature space.
///
/// Every example becomes a support vector with coefficient `1/n+` or `-1/n-`,
/// so the per-class counts are already balanced and the class weights have no
/// further effect. With the linear kernel the model collapses to the
/// hyperplane orthogonal to the difference of the mean vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDifferenceSolver;

impl SvmSolver for MeanDifferenceSolver {
    fn solve(&self, problem: &SvmProblem, parameters: &SvmParameters) -> Result<SvmModel> {
        parameters.validate()?;
        problem.validate()?;

        let positive_coefficient = 1.0 / problem.positive_count() as f64;
        let negative_coefficient = -1.0 / problem.negative_count() as f64;
        let coefficients: Vec<f64> = problem
            .labels()
            .iter()
            .map(|&label| if label > 0.0 { positive_coefficient } else { negative_coefficient })
            .collect();

        let model = SvmModel::new(
            parameters.kernel,
            problem.examples().to_vec(),
            coefficients,
            0.0,
        )?;

        let (mut positive_sum, mut negative_sum) = (0.0, 0.0);
        for (features, positive) in problem.iter() {
            let output = model.hyperplane_distance(features);
            if positive {
                positive_sum += output;
            } else {
                negative_sum += output;
            }
        }
        let midpoint = 0.5
            * (positive_sum * positive_coefficient - negative_sum * negative_coefficient);

        Ok(model.with_bias(-midpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::Kernel;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn problem() -> SvmProblem {
        let mut problem = SvmProblem::new();
        problem.push_positive(DVector::from_vec(vec![2.0, 0.0]));
        problem.push_positive(DVector::from_vec(vec![4.0, 0.0]));
        problem.push_negative(DVector::from_vec(vec![-1.0, 0.0]));
        problem.push_negative(DVector::from_vec(vec![-3.0, 0.0]));
        problem
    }

    #[test]
    fn test_linear_boundary_between_means() {
        let model = MeanDifferenceSolver
            .solve(&problem(), &SvmParameters::new(Kernel::Linear, 1.0))
            .unwrap();

        // means at 3 and -2, midpoint at 0.5
        assert_relative_eq!(
            model.hyperplane_distance(&DVector::from_vec(vec![0.5, 7.0])),
            0.0,
            epsilon = 1e-12
        );
        assert!(model.hyperplane_distance(&DVector::from_vec(vec![3.0, 0.0])) > 0.0);
        assert!(model.hyperplane_distance(&DVector::from_vec(vec![-2.0, 0.0])) < 0.0);
    }

    #[test]
    fn test_rbf_separates_classes() {
        let model = MeanDifferenceSolver
            .solve(&problem(), &SvmParameters::new(Kernel::Rbf { gamma: 0.5 }, 1.0))
            .unwrap();
        for (features, positive) in problem().iter() {
            assert_eq!(model.hyperplane_distance(features) > 0.0, positive);
        }
    }

    #[test]
    fn test_rejects_single_class_and_bad_parameters() {
        let mut single = SvmProblem::new();
        single.push_positive(DVector::zeros(2));
        assert!(MeanDifferenceSolver.solve(&single, &SvmParameters::default()).is_err());

        let bad = SvmParameters::new(Kernel::Linear, -1.0);
        assert!(matches!(
            MeanDifferenceSolver.solve(&problem(), &bad),
            Err(crate::Error::InvalidConfig(_))
        ));
    }
}
