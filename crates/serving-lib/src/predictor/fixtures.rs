//! Small ONNX graphs built in memory for predictor tests

use prost::Message;
use tract_onnx::pb::{
    self, tensor_proto::DataType, tensor_shape_proto::dimension::Value as DimValue,
    tensor_shape_proto::Dimension, type_proto,
};

/// Leading batch axis as an exporter would declare it
#[derive(Debug, Clone)]
pub enum Batch {
    /// No value at all, as written for a `None` batch size
    Unset,
    /// Named symbolic axis
    Named(&'static str),
    Fixed(i64),
}

fn dim(value: Option<DimValue>) -> Dimension {
    Dimension {
        value,
        ..Default::default()
    }
}

fn batch_dim(batch: &Batch) -> Dimension {
    match batch {
        Batch::Unset => dim(None),
        Batch::Named(name) => dim(Some(DimValue::DimParam(name.to_string()))),
        Batch::Fixed(n) => dim(Some(DimValue::DimValue(*n))),
    }
}

fn value_info(name: &str, elem: DataType, dims: Vec<Dimension>) -> pb::ValueInfoProto {
    pb::ValueInfoProto {
        name: name.to_string(),
        r#type: Some(pb::TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: elem as i32,
                shape: Some(pb::TensorShapeProto { dim: dims }),
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn initializer(name: &str, elem: DataType, dims: Vec<i64>, values: &[f64]) -> pb::TensorProto {
    let mut tensor = pb::TensorProto {
        name: name.to_string(),
        data_type: elem as i32,
        dims,
        ..Default::default()
    };
    match elem {
        DataType::Double => tensor.double_data = values.to_vec(),
        _ => tensor.float_data = values.iter().map(|v| *v as f32).collect(),
    }
    tensor
}

fn node(op_type: &str, inputs: &[&str], output: &str) -> pb::NodeProto {
    pb::NodeProto {
        op_type: op_type.to_string(),
        name: output.to_string(),
        input: inputs.iter().map(|s| s.to_string()).collect(),
        output: vec![output.to_string()],
        ..Default::default()
    }
}

/// `Y = X . W + B` with `X: [batch, weights.len()]` and `Y: [batch, 1]`
pub fn linear_graph(weights: &[f64], bias: f64, elem: DataType, batch: Batch) -> Vec<u8> {
    let n = weights.len() as i64;
    let graph = pb::GraphProto {
        name: "linear".to_string(),
        node: vec![node("MatMul", &["X", "W"], "XW"), node("Add", &["XW", "B"], "Y")],
        initializer: vec![
            initializer("W", elem, vec![n, 1], weights),
            initializer("B", elem, vec![1], &[bias]),
        ],
        input: vec![value_info(
            "X",
            elem,
            vec![batch_dim(&batch), dim(Some(DimValue::DimValue(n)))],
        )],
        output: vec![value_info(
            "Y",
            elem,
            vec![batch_dim(&batch), dim(Some(DimValue::DimValue(1)))],
        )],
        ..Default::default()
    };

    pb::ModelProto {
        ir_version: 7,
        producer_name: "serving-lib-tests".to_string(),
        opset_import: vec![pb::OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        ..Default::default()
    }
    .encode_to_vec()
}
