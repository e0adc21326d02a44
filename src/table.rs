//! Tabulation of the PMT response over a mesh of vertex positions,
//! and interpolation in the resulting table.
//!
//! By rotational symmetry the response depends only on the distance of
//! the vertex from the centre, r, and on the angle θ between the vertex
//! and the PMT, as seen from the centre. The table is built with the PMT
//! at the north pole and the vertex in the yz-plane.

use std::f64::consts;
use rand::prelude::*;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use indicatif::{ProgressBar, ProgressStyle, ParallelProgressIterator};

use crate::detector::Detector;
use crate::error::{ProbeError, TableError};
use crate::geometry::*;
use crate::pe::*;
use crate::sampler::linspace;

/// Layout of the mesh and how it is to be evaluated
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableSpec {
    /// Number of polar angles, and of radii inside `edge_radius`
    pub precision: usize,
    pub min_radius: f64,
    /// Radius beyond which radial points are placed twice as densely
    pub edge_radius: f64,
    /// Size of the worker pool
    pub threads: usize,
    /// Show a progress bar?
    pub progress: bool,
}

impl Default for TableSpec {
    fn default() -> Self {
        TableSpec {
            precision: 100,
            min_radius: 0.2,
            edge_radius: 16.5,
            threads: 2,
            progress: true,
        }
    }
}

impl TableSpec {
    /// Radial nodes: `precision` points in [min_radius, edge_radius),
    /// followed by `precision / 2` in [edge_radius, `ls_radius`].
    pub fn radii(&self, ls_radius: f64) -> Vec<f64> {
        let n = self.precision.max(2);
        let step = (self.edge_radius - self.min_radius) / (n as f64);
        let mut radii: Vec<f64> = (0..n)
            .map(|i| self.min_radius + (i as f64) * step)
            .collect();
        radii.extend(linspace(self.edge_radius, ls_radius, n / 2));
        radii
    }

    /// Angular nodes: `precision` points in [0, π].
    pub fn thetas(&self) -> Vec<f64> {
        linspace(0.0, consts::PI, self.precision.max(2))
    }
}

/// The probabilities and arrival-time moments of the PMT response,
/// tabulated on a rectangular (r, θ) mesh
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeTable {
    radii: Vec<f64>,
    thetas: Vec<f64>,
    /// Row-major, θ varying fastest
    nodes: Vec<GridSample>,
}

/// Locates `x` on `axis`, which must be sorted in ascending order,
/// returning the index of the lower node and the fractional distance
/// to the next. Points beyond either end are clamped.
fn bracket(axis: &[f64], x: f64) -> (usize, f64) {
    let last = axis.len() - 1;
    if last == 0 || x <= axis[0] {
        return (0, 0.0);
    }
    if x >= axis[last] {
        return (last - 1, 1.0);
    }
    let i = axis.partition_point(|&a| a <= x) - 1;
    let frac = (x - axis[i]) / (axis[i + 1] - axis[i]);
    (i, frac)
}

impl ProbeTable {
    /// Assembles a table from its axes and nodes.
    /// Returns `None` unless the axes are non-empty and there is exactly
    /// one node per (r, θ) pair.
    pub fn from_nodes(radii: Vec<f64>, thetas: Vec<f64>, nodes: Vec<GridSample>) -> Option<Self> {
        if radii.is_empty() || thetas.is_empty() || nodes.len() != radii.len() * thetas.len() {
            None
        } else {
            Some(ProbeTable {radii, thetas, nodes})
        }
    }

    /// Evaluates the PMT response at every node of the mesh defined by
    /// `spec`, in parallel.
    pub fn build(model: &OpticalModel, spec: &TableSpec) -> Result<Self, TableError> {
        let radii = spec.radii(model.detector().ls_radius);
        let thetas = spec.thetas();
        let pmt = PmtAngles::new(0.0, 0.0);

        let mesh: Vec<(f64, f64)> = radii.iter()
            .flat_map(|&r| thetas.iter().map(move |&theta| (r, theta)))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(spec.threads)
            .build()
            .map_err(|e| TableError::ThreadPool(e.to_string()))?;

        let bar = if spec.progress {
            let bar = ProgressBar::new(mesh.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] [{bar:40}] {pos}/{len} nodes (ETA {eta})") {
                bar.set_style(style.progress_chars("##-"));
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let nodes: Result<Vec<GridSample>, ProbeError> = pool.install(|| {
            mesh.par_iter()
                .progress_with(bar)
                .map(|&(r, theta)| {
                    let vertex = ThreeVector::new(0.0, r * theta.sin(), r * theta.cos());
                    model.grid_sample(vertex, pmt)
                })
                .collect()
        });

        Ok(ProbeTable {radii, thetas, nodes: nodes?})
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn thetas(&self) -> &[f64] {
        &self.thetas
    }

    /// Returns the node at the `i`-th radius and `j`-th angle.
    pub fn node(&self, i: usize, j: usize) -> &GridSample {
        &self.nodes[i * self.thetas.len() + j]
    }

    /// Iterates over the nodes as `(r, θ, values)`, θ varying fastest.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, &GridSample)> + '_ {
        let n = self.thetas.len();
        self.nodes.iter()
            .enumerate()
            .map(move |(k, node)| (self.radii[k / n], self.thetas[k % n], node))
    }

    /// Bilinear interpolation of the tabulated response at (`r`, `theta`),
    /// clamped to the edges of the table.
    pub fn evaluate(&self, r: f64, theta: f64) -> GridSample {
        let (i, u) = bracket(&self.radii, r);
        let (j, v) = bracket(&self.thetas, theta);
        let i1 = (i + 1).min(self.radii.len() - 1);
        let j1 = (j + 1).min(self.thetas.len() - 1);

        let corners = [
            (self.node(i, j).to_array(), (1.0 - u) * (1.0 - v)),
            (self.node(i1, j).to_array(), u * (1.0 - v)),
            (self.node(i, j1).to_array(), (1.0 - u) * v),
            (self.node(i1, j1).to_array(), u * v),
        ];

        let mut values = [0.0; 6];
        for (corner, weight) in corners.iter() {
            for (value, c) in values.iter_mut().zip(corner.iter()) {
                *value += weight * c;
            }
        }

        GridSample::from_array(values)
    }

    /// Draws an arrival time, in seconds, for a vertex at (`r`, `theta`)
    /// relative to a PMT: the reflection order is chosen in proportion to
    /// the interpolated probabilities, then the time from a normal
    /// distribution with the interpolated mean and standard deviation.
    ///
    /// Returns `None` if neither order can reach the PMT.
    pub fn sample_time<R: Rng>(&self, r: f64, theta: f64, rng: &mut R) -> Option<f64> {
        let s = self.evaluate(r, theta);
        let total = s.direct_probability + s.reflected_probability;

        if total <= 0.0 {
            return None;
        }

        let (mean, std) = if rng.gen::<f64>() < s.direct_probability / total {
            (s.direct_mean_time, s.direct_std_time)
        } else {
            (s.reflected_mean_time, s.reflected_std_time)
        };

        let z: f64 = rng.sample(StandardNormal);
        Some(mean + std * z)
    }
}

/// Coordinates (r, θ) of `vertex` in a table: its distance from the
/// centre and its angle, seen from the centre, to the PMT at `pmt`.
pub fn relative_position(detector: &Detector, vertex: ThreeVector, pmt: PmtAngles) -> (f64, f64) {
    let r = vertex.norm();
    if r == 0.0 {
        return (0.0, 0.0);
    }

    // law of cosines in the triangle centre-vertex-PMT
    let big_r = detector.shell_radius;
    let d = (detector.pmt_position(pmt) - vertex).norm();
    let cos_theta = (r * r + big_r * big_r - d * d) / (2.0 * r * big_r);
    let theta = cos_theta.max(-1.0).min(1.0).acos();

    (r, theta)
}

#[cfg(test)]
mod tests {
    use rand_xoshiro::Xoshiro256StarStar;
    use crate::sampler::SamplerSettings;
    use super::*;

    /// Each value is a different linear function of r and θ
    fn linear(r: f64, theta: f64) -> GridSample {
        GridSample::from_array([
            1.0 + r, 2.0 * theta, r + theta,
            3.0 - r, 0.5 * r - theta, 7.0,
        ])
    }

    fn linear_table() -> ProbeTable {
        let radii = vec![0.0, 1.0, 3.0, 6.0];
        let thetas = vec![0.0, 0.5, 2.0];
        let nodes = radii.iter()
            .flat_map(|&r| thetas.iter().map(move |&t| linear(r, t)))
            .collect();
        ProbeTable::from_nodes(radii, thetas, nodes).unwrap()
    }

    #[test]
    fn mesh_layout() {
        let spec = TableSpec {precision: 4, min_radius: 0.2, edge_radius: 16.2, ..Default::default()};
        let radii = spec.radii(17.2);
        println!("r = {:?}", radii);
        let expected = [0.2, 4.2, 8.2, 12.2, 16.2, 17.2];
        assert_eq!(radii.len(), expected.len());
        assert!(radii.iter().zip(expected.iter()).all(|(a, b)| (a - b).abs() < 1.0e-12));
        assert!(radii.windows(2).all(|w| w[1] > w[0]));

        let thetas = spec.thetas();
        assert_eq!(thetas.len(), 4);
        assert_eq!(thetas[0], 0.0);
        assert_eq!(thetas[3], consts::PI);
    }

    #[test]
    fn interpolation() {
        let table = linear_table();

        // reproduces the nodes
        for (r, theta, node) in table.iter() {
            assert_eq!(table.evaluate(r, theta), *node);
        }

        // and linear functions everywhere inside
        for &(r, theta) in [(0.5, 0.25), (2.9, 1.7), (4.0, 0.1), (5.999, 1.999)].iter() {
            let value = table.evaluate(r, theta).to_array();
            let expected = linear(r, theta).to_array();
            println!("({}, {}): {:?} vs {:?}", r, theta, value, expected);
            for (a, b) in value.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1.0e-12);
            }
        }

        // clamped outside
        assert_eq!(table.evaluate(10.0, 3.0), linear(6.0, 2.0));
        assert_eq!(table.evaluate(-1.0, -1.0), linear(0.0, 0.0));
    }

    #[test]
    fn malformed_tables() {
        let nodes = vec![GridSample::default(); 5];
        assert!(ProbeTable::from_nodes(vec![0.0, 1.0], vec![0.0, 1.0, 2.0], nodes).is_none());
        assert!(ProbeTable::from_nodes(vec![], vec![0.0], vec![]).is_none());
    }

    #[test]
    fn relative_coordinates() {
        let detector = Detector::default();
        let pmt = PmtAngles::new(0.0, 0.0);

        assert_eq!(relative_position(&detector, ThreeVector::new(0.0, 0.0, 0.0), pmt), (0.0, 0.0));

        let (r, theta) = relative_position(&detector, ThreeVector::new(0.0, 0.0, 5.0), pmt);
        assert!((r - 5.0).abs() < 1.0e-12 && theta.abs() < 1.0e-6);

        let (r, theta) = relative_position(&detector, ThreeVector::new(0.0, 3.0, 0.0), pmt);
        assert!((r - 3.0).abs() < 1.0e-12 && (theta - consts::FRAC_PI_2).abs() < 1.0e-12);

        let (_, theta) = relative_position(&detector, ThreeVector::new(0.0, 0.0, -5.0), pmt);
        assert!((theta - consts::PI).abs() < 1.0e-6);

        // PMT on the x-axis, vertex at 45 degrees
        let pmt = PmtAngles::new(0.0, consts::FRAC_PI_2);
        let (r, theta) = relative_position(&detector, ThreeVector::new(1.0, 1.0, 0.0), pmt);
        assert!((r - 2f64.sqrt()).abs() < 1.0e-12);
        assert!((theta - consts::FRAC_PI_4).abs() < 1.0e-9);
    }

    #[test]
    fn time_sampling() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);

        let dark = ProbeTable::from_nodes(vec![0.0, 1.0], vec![0.0, 1.0], vec![GridSample::default(); 4]).unwrap();
        assert!(dark.sample_time(0.5, 0.5, &mut rng).is_none());

        let node = GridSample {
            direct_probability: 1.0e-4,
            reflected_probability: 0.0,
            direct_mean_time: 1.0e-7,
            direct_std_time: 2.0e-9,
            ..Default::default()
        };
        let bright = ProbeTable::from_nodes(vec![0.0, 1.0], vec![0.0, 1.0], vec![node; 4]).unwrap();
        let times: Vec<f64> = (0..10_000)
            .filter_map(|_| bright.sample_time(0.5, 0.5, &mut rng))
            .collect();
        let mean = times.iter().sum::<f64>() / (times.len() as f64);
        let std = (times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (times.len() as f64)).sqrt();
        println!("<t> = {:.4e}, std = {:.4e}", mean, std);
        assert_eq!(times.len(), 10_000);
        assert!((mean - 1.0e-7).abs() < 1.0e-10);
        assert!((std - 2.0e-9).abs() < 1.0e-10);
    }

    #[test]
    fn small_table() {
        let accuracy = Accuracy {grid: Refinement::new(40, 40), ..Default::default()};
        let model = OpticalModel::new(Detector::default(), SamplerSettings::default(), accuracy);
        let spec = TableSpec {precision: 2, threads: 2, progress: false, ..Default::default()};
        let table = ProbeTable::build(&model, &spec).unwrap();

        assert_eq!(table.radii().len(), 3);
        assert_eq!(table.thetas().len(), 2);

        for (r, theta, node) in table.iter() {
            println!("r = {:.3}, theta = {:.3}: {:?}", r, theta, node);
        }

        // the vertex closest to the PMT sees it best
        let near = table.node(1, 0);
        let far = table.node(1, 1);
        assert!(near.direct_probability > far.direct_probability);
        assert!(near.direct_mean_time < far.direct_mean_time);

        // results land on the nodes they were computed for
        let vertex = ThreeVector::new(0.0, 0.0, table.radii()[1]);
        let direct = model.grid_sample(vertex, PmtAngles::new(0.0, 0.0)).unwrap();
        assert_eq!(*near, direct);
    }

    #[test]
    #[ignore]
    fn full_table() {
        let model = OpticalModel::new(Detector::default(), SamplerSettings::default(), Accuracy::default());
        let spec = TableSpec {precision: 20, threads: 8, ..Default::default()};
        let table = ProbeTable::build(&model, &spec).unwrap();
        let s = table.evaluate(10.0, 0.3);
        println!("{:#?}", s);
        assert!(s.direct_probability > 0.0);
    }
}
