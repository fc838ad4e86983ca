//! Hand-authored vertex data

/// Right triangle shared by the point and line batches
pub const COAST: [[f32; 3]; 3] = [
    [3.0, 3.0, 0.0],
    [0.0, 3.0, 0.0],
    [3.0, 0.0, 0.0],
];

/// Four side faces of a square pyramid, one triangle per face
pub const PYRAMID: [[f32; 3]; 12] = [
    [-2.0, 0.0, -2.0],
    [2.0, 0.0, -2.0],
    [0.0, 4.0, 0.0],

    [2.0, 0.0, -2.0],
    [2.0, 0.0, 2.0],
    [0.0, 4.0, 0.0],

    [2.0, 0.0, 2.0],
    [-2.0, 0.0, 2.0],
    [0.0, 4.0, 0.0],

    [-2.0, 0.0, 2.0],
    [-2.0, 0.0, -2.0],
    [0.0, 4.0, 0.0],
];
