use nalgebra::{Point3, Unit, Vector3};

const DEGENERACY_EPSILON: f64 = 1e-10;

/// Returns a unit vector perpendicular to `v`, or `None` if `v` is (nearly) zero.
pub fn perpendicular_unit(v: &Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
    let axis = Unit::try_new(*v, DEGENERACY_EPSILON)?;
    let helper = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::try_new(helper - axis.into_inner() * axis.dot(&helper), DEGENERACY_EPSILON)
}

/// Intersection point of three planes, each given by a normal and a point on it.
///
/// Returns `None` when the normals are (nearly) linearly dependent.
pub fn intersect_three_planes(
    n1: &Vector3<f64>,
    p1: &Point3<f64>,
    n2: &Vector3<f64>,
    p2: &Point3<f64>,
    n3: &Vector3<f64>,
    p3: &Point3<f64>,
) -> Option<Point3<f64>> {
    let n2_x_n3 = n2.cross(n3);
    let denominator = n1.dot(&n2_x_n3);
    if denominator.abs() < DEGENERACY_EPSILON {
        return None;
    }
    let d1 = n1.dot(&p1.coords);
    let d2 = n2.dot(&p2.coords);
    let d3 = n3.dot(&p3.coords);
    let numerator = n2_x_n3 * d1 + n3.cross(n1) * d2 + n1.cross(n2) * d3;
    Some(Point3::from(numerator / denominator))
}

/// Places the amide hydrogen of a backbone nitrogen along the previous
/// residue's carbonyl direction (`C - O`), `bond_length` away from `n_pos`.
pub fn calculate_amide_hydrogen(
    n_pos: &Point3<f64>,
    prev_c_pos: &Point3<f64>,
    prev_o_pos: &Point3<f64>,
    bond_length: f64,
) -> Option<Point3<f64>> {
    let direction = Unit::try_new(prev_c_pos - prev_o_pos, DEGENERACY_EPSILON)?;
    Some(n_pos + direction.into_inner() * bond_length)
}

/// Torsion angle `p1-p2-p3-p4` in degrees, in `(-180, 180]`.
///
/// Positive when, looking from `p2` along `p2 -> p3`, the near bond turns
/// clockwise onto the far one. Returns `None` when three consecutive
/// points are (nearly) collinear.
pub fn calculate_dihedral(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> Option<f64> {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;
    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    if n1.norm_squared() < DEGENERACY_EPSILON || n2.norm_squared() < DEGENERACY_EPSILON {
        return None;
    }
    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    Some(y.atan2(x).to_degrees())
}
