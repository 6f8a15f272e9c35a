//! Binary logistic regression fitted by batch gradient descent.

use ndarray::{Array1, Array2};

use crate::{
    config::ModelConfig,
    error::{Result, TrendlexError},
};

/// L2-penalised logistic regression.
///
/// Minimises `0.5 * |w|^2 / (C * n) + mean log loss`; the intercept is not
/// penalised. Each step is `learning_rate` over a Lipschitz bound of the
/// gradient, so rates below 2 converge whatever the feature scale.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    c: f64,
    pub cost_history: Vec<f64>,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iter: usize, tolerance: f64, c: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            c,
            cost_history: Vec::new(),
        }
    }

    pub fn from_config(cfg: &ModelConfig) -> Self {
        Self::new(cfg.learning_rate, cfg.max_iter, cfg.tolerance, cfg.c)
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn log_loss(y: &Array1<f64>, p: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        -y.iter()
            .zip(p.iter())
            .map(|(&y, &p)| {
                let p = p.clamp(eps, 1.0 - eps);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>()
            / y.len() as f64
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(TrendlexError::Model {
                reason: format!("{} rows but {} labels", x.nrows(), y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(TrendlexError::Model {
                reason: "no training rows".to_string(),
            });
        }

        let n = x.nrows() as f64;
        let alpha = 1.0 / (self.c * n);
        let max_sq_norm = x
            .rows()
            .into_iter()
            .map(|row| row.dot(&row))
            .fold(0.0, f64::max);
        let step = self.learning_rate / (0.25 * (max_sq_norm + 1.0) + alpha).max(1.0);
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;
        self.cost_history.clear();

        for iter in 0..self.max_iter {
            let predictions = (x.dot(&weights) + bias).mapv(Self::sigmoid);
            let errors = &predictions - y;

            let dw = x.t().dot(&errors) / n + &weights * alpha;
            let db = errors.sum() / n;

            let cost = Self::log_loss(y, &predictions) + 0.5 * alpha * weights.dot(&weights);
            self.cost_history.push(cost);

            weights = weights - dw * step;
            bias -= step * db;

            if iter > 0 && (self.cost_history[iter - 1] - cost).abs() < self.tolerance {
                log::debug!("converged after {iter} iterations");
                break;
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        Ok(())
    }

    fn parameters(&self) -> Result<(&Array1<f64>, f64)> {
        match (&self.coefficients, self.intercept) {
            (Some(w), Some(b)) => Ok((w, b)),
            _ => Err(TrendlexError::Model {
                reason: "model has not been fitted".to_string(),
            }),
        }
    }

    /// Probability of the positive class per row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (weights, bias) = self.parameters()?;
        if x.ncols() != weights.len() {
            return Err(TrendlexError::Model {
                reason: format!("expected {} features, got {}", weights.len(), x.ncols()),
            });
        }
        Ok((x.dot(weights) + bias).mapv(Self::sigmoid))
    }

    /// Class labels at the 0.5 threshold
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(x)?
            .iter()
            .map(|&p| u8::from(p > 0.5))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 5.0, 5.0, 5.5, 5.5, 6.0, 6.0],
        )
        .unwrap();
        let y = Array1::from_vec(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        (x, y)
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(LogisticRegression::sigmoid(800.0) <= 1.0);
        assert!(LogisticRegression::sigmoid(-800.0) >= 0.0);
    }

    #[test]
    fn test_fit_separates_classes() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(1.0, 2000, 1e-9, 1.0);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), vec![0, 0, 0, 1, 1, 1]);
        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[0] < proba[5]);

        let first = model.cost_history[0];
        let last = *model.cost_history.last().unwrap();
        assert!(last < first);
    }

    #[test]
    fn test_stronger_penalty_shrinks_weights() {
        let (x, y) = separable();
        let mut loose = LogisticRegression::new(1.0, 2000, 1e-9, 100.0);
        let mut tight = LogisticRegression::new(1.0, 2000, 1e-9, 0.1);
        loose.fit(&x, &y).unwrap();
        tight.fit(&x, &y).unwrap();

        let norm = |m: &LogisticRegression| {
            let w = m.coefficients.as_ref().unwrap();
            w.dot(w).sqrt()
        };
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn test_unfitted_and_mismatched_inputs() {
        let (x, y) = separable();
        let model = LogisticRegression::new(0.1, 10, 1e-6, 1.0);
        assert!(model.predict_proba(&x).is_err());

        let mut model = LogisticRegression::new(0.1, 10, 1e-6, 1.0);
        assert!(model.fit(&x, &Array1::zeros(2)).is_err());
        model.fit(&x, &y).unwrap();
        assert!(model.predict(&Array2::zeros((1, 3))).is_err());
    }
}
