//! Fitted multi-layer perceptron regressor.
//!
//! Hidden layers share one activation function; the output layer is linear
//! and produces a single value per row. A batch moves through the network as
//! one matrix product per layer.

use ndarray::{Array1, Array2, ArrayView2};
use relocation_core::ScoreError;
use serde::{Deserialize, Serialize};

use crate::{ArtefactError, Regressor};

const KIND: &str = "model";

/// Activation applied after every hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// `max(0, x)`.
    #[default]
    Relu,
    /// Hyperbolic tangent.
    Tanh,
    /// Logistic sigmoid.
    Logistic,
    /// No transformation.
    Identity,
}

impl Activation {
    /// Apply the activation to one value.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the logistic sigmoid is defined arithmetically"
    )]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Relu => value.max(0.0),
            Self::Tanh => value.tanh(),
            Self::Logistic => 1.0 / (1.0 + (-value).exp()),
            Self::Identity => value,
        }
    }
}

/// One fully connected layer as stored in the model artefact.
///
/// `weights` has one row per input and one column per output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weight matrix indexed `[input][output]`.
    pub weights: Vec<Vec<f64>>,
    /// Bias per output.
    pub biases: Vec<f64>,
}

impl DenseLayer {
    /// Number of inputs the layer consumes.
    #[must_use]
    pub fn inputs(&self) -> usize {
        self.weights.len()
    }

    /// Number of outputs the layer produces.
    #[must_use]
    pub fn outputs(&self) -> usize {
        self.biases.len()
    }
}

/// A validated layer laid out for matrix products.
#[derive(Debug, Clone, PartialEq)]
struct FittedLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
}

impl FittedLayer {
    fn fit(depth: usize, layer: DenseLayer) -> Result<Self, ArtefactError> {
        let shape = (layer.inputs(), layer.outputs());
        let weights = Array2::from_shape_vec(shape, layer.weights.into_iter().flatten().collect())
            .map_err(|err| invalid(format!("layer {depth} weights: {err}")))?;
        Ok(Self {
            weights,
            biases: Array1::from(layer.biases),
        })
    }

    fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases
    }
}

/// On-disk form of [`MlpRegressor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MlpDocument {
    #[serde(default)]
    pub(crate) activation: Activation,
    pub(crate) layers: Vec<DenseLayer>,
}

/// Feed-forward regressor with a single linear output.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use relocation_scorer::{Activation, DenseLayer, MlpRegressor, Regressor};
///
/// let model = MlpRegressor::new(
///     Activation::Identity,
///     vec![DenseLayer { weights: vec![vec![2.0], vec![1.0]], biases: vec![0.5] }],
/// )
/// .unwrap();
/// assert_eq!(model.predict(array![[1.0, 3.0]].view()).unwrap(), array![5.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MlpRegressor {
    activation: Activation,
    layers: Vec<FittedLayer>,
}

impl MlpRegressor {
    /// Validate and construct a regressor.
    ///
    /// # Errors
    /// Returns [`ArtefactError::Invalid`] when there are no layers, a weight
    /// row disagrees with its bias vector, consecutive layers do not chain, the
    /// final layer has more than one output, or any parameter is non-finite.
    pub fn new(activation: Activation, layers: Vec<DenseLayer>) -> Result<Self, ArtefactError> {
        let Some(last) = layers.last() else {
            return Err(invalid("model has no layers"));
        };
        if last.outputs() != 1 {
            return Err(invalid(format!(
                "output layer has {} units; expected 1",
                last.outputs()
            )));
        }
        for (depth, layer) in layers.iter().enumerate() {
            validate_layer(depth, layer)?;
        }
        for (depth, pair) in layers.windows(2).enumerate() {
            if let [previous, next] = pair
                && previous.outputs() != next.inputs()
            {
                return Err(invalid(format!(
                    "layer {depth} produces {} values but layer {} consumes {}",
                    previous.outputs(),
                    depth.saturating_add(1),
                    next.inputs()
                )));
            }
        }
        let fitted: Vec<FittedLayer> = layers
            .into_iter()
            .enumerate()
            .map(|(depth, layer)| FittedLayer::fit(depth, layer))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            activation,
            layers: fitted,
        })
    }

    /// Hidden-layer activation.
    #[must_use]
    pub const fn activation(&self) -> Activation {
        self.activation
    }

    /// Number of layers, the output layer included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub(crate) fn from_document(document: MlpDocument) -> Result<Self, ArtefactError> {
        Self::new(document.activation, document.layers)
    }

    fn forward(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        let hidden = self.layers.len().saturating_sub(1);
        let mut values = rows.to_owned();
        for (depth, layer) in self.layers.iter().enumerate() {
            values = layer.forward(&values);
            if depth < hidden {
                values.mapv_inplace(|value| self.activation.apply(value));
            }
        }
        // The output layer has exactly one unit.
        values
            .columns()
            .into_iter()
            .next()
            .map_or_else(|| Array1::zeros(rows.nrows()), |output| output.to_owned())
    }
}

impl Regressor for MlpRegressor {
    fn input_width(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.weights.nrows())
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ScoreError> {
        let expected = self.input_width();
        if rows.ncols() != expected {
            return Err(ScoreError::FeatureWidth {
                stage: KIND,
                expected,
                found: rows.ncols(),
            });
        }
        Ok(self.forward(rows))
    }
}

fn validate_layer(depth: usize, layer: &DenseLayer) -> Result<(), ArtefactError> {
    if layer.inputs() == 0 || layer.outputs() == 0 {
        return Err(invalid(format!("layer {depth} is empty")));
    }
    if let Some(row) = layer
        .weights
        .iter()
        .position(|weights| weights.len() != layer.outputs())
    {
        return Err(invalid(format!(
            "layer {depth} weight row {row} does not match {} biases",
            layer.outputs()
        )));
    }
    let finite = layer
        .weights
        .iter()
        .flatten()
        .chain(&layer.biases)
        .all(|value| value.is_finite());
    if !finite {
        return Err(invalid(format!("layer {depth} holds non-finite parameters")));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> ArtefactError {
    ArtefactError::Invalid {
        kind: KIND,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    fn layer(weights: Vec<Vec<f64>>, biases: Vec<f64>) -> DenseLayer {
        DenseLayer { weights, biases }
    }

    #[rstest]
    #[case(Activation::Relu, -2.0, 0.0)]
    #[case(Activation::Relu, 1.5, 1.5)]
    #[case(Activation::Identity, -2.0, -2.0)]
    #[case(Activation::Logistic, 0.0, 0.5)]
    #[case(Activation::Tanh, 0.0, 0.0)]
    fn activations_match_their_definitions(
        #[case] activation: Activation,
        #[case] input: f64,
        #[case] expected: f64,
    ) {
        assert!((activation.apply(input) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn hidden_layers_apply_activation_but_output_is_linear() {
        // One hidden unit computing x - 1, then output 2h - 3.
        let model = MlpRegressor::new(
            Activation::Relu,
            vec![layer(vec![vec![1.0]], vec![-1.0]), layer(vec![vec![2.0]], vec![-3.0])],
        )
        .expect("valid model");
        let predictions = model
            .predict(array![[0.0], [4.0]].view())
            .expect("predict");
        // Row 0: relu(-1) = 0 so the output is the bias alone.
        assert_eq!(predictions, array![-3.0, 3.0]);
    }

    #[rstest]
    fn predict_rejects_rows_of_the_wrong_width() {
        let model = MlpRegressor::new(
            Activation::Identity,
            vec![layer(vec![vec![1.0], vec![1.0]], vec![0.0])],
        )
        .expect("valid model");
        assert_eq!(
            model.predict(array![[1.0]].view()),
            Err(ScoreError::FeatureWidth {
                stage: "model",
                expected: 2,
                found: 1
            })
        );
    }

    #[rstest]
    #[case::no_layers(vec![])]
    #[case::wide_output(vec![layer(vec![vec![1.0, 1.0]], vec![0.0, 0.0])])]
    #[case::ragged(vec![layer(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0])])]
    #[case::broken_chain(vec![
        layer(vec![vec![1.0, 1.0]], vec![0.0, 0.0]),
        layer(vec![vec![1.0]], vec![0.0]),
    ])]
    #[case::non_finite(vec![layer(vec![vec![f64::NAN]], vec![0.0])])]
    fn new_rejects_malformed_layers(#[case] layers: Vec<DenseLayer>) {
        let err = MlpRegressor::new(Activation::Relu, layers).expect_err("invalid model");
        assert!(matches!(err, ArtefactError::Invalid { kind: "model", .. }));
    }

    #[rstest]
    fn documents_default_to_relu() {
        let document: MlpDocument =
            serde_json::from_str(r#"{"layers": [{"weights": [[1.0]], "biases": [0.0]}]}"#)
                .expect("decode document");
        let model = MlpRegressor::from_document(document).expect("valid model");
        assert_eq!(model.activation(), Activation::Relu);
        assert_eq!(model.input_width(), 1);
        assert_eq!(model.depth(), 1);
    }

    #[rstest]
    fn batches_flow_through_every_layer_at_once() {
        // Two inputs feed two tanh units; the output weighs them 1 and -1.
        let model = MlpRegressor::new(
            Activation::Tanh,
            vec![
                layer(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.0]),
                layer(vec![vec![1.0], vec![-1.0]], vec![0.0]),
            ],
        )
        .expect("valid model");
        let rows = array![[0.5, 0.5], [1.0, 0.0], [0.0, 2.0]];

        let predictions = model.predict(rows.view()).expect("predict");

        let expected = [0.0, 1.0_f64.tanh(), -(2.0_f64.tanh())];
        assert_eq!(predictions.len(), expected.len());
        for (found, wanted) in predictions.iter().zip(expected) {
            assert!((found - wanted).abs() < 1e-12, "{found} != {wanted}");
        }
    }

    #[rstest]
    fn empty_batches_predict_nothing() {
        let model = MlpRegressor::new(Activation::Relu, vec![layer(vec![vec![1.0]], vec![0.0])])
            .expect("valid model");
        let rows = Array2::<f64>::zeros((0, 1));
        assert!(model.predict(rows.view()).expect("predict").is_empty());
    }
}
