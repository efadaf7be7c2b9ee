use crate::pipeline::types::Landmark;

/// Planar distance between two landmarks; depth is ignored.
pub fn distance(p1: &Landmark, p2: &Landmark) -> f64 {
    squared_distance(p1, p2).sqrt()
}

pub fn squared_distance(p1: &Landmark, p2: &Landmark) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    dx * dx + dy * dy
}

/// True when `upper` sits strictly above `lower` on screen.
pub fn is_above(upper: &Landmark, lower: &Landmark) -> bool {
    upper.y < lower.y
}

/// Extension test for the four non-thumb fingers. Assumes a roughly upright
/// hand: tip above pip above mcp.
pub fn is_extended(tip: &Landmark, pip: &Landmark, mcp: &Landmark) -> bool {
    is_above(tip, pip) && is_above(pip, mcp)
}

/// The thumb bends across the palm rather than along image y, so it counts
/// as extended when its last segment is longer than the one before it.
pub fn thumb_extended(tip: &Landmark, ip: &Landmark, mcp: &Landmark) -> bool {
    squared_distance(tip, ip) > squared_distance(ip, mcp)
}
