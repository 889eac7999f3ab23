use super::FilterError;

/// Compute the radius of a gaussian kernel for the given sigma.
///
/// The radius covers three standard deviations and is never smaller than one, so any sigma
/// (including degenerate ones) resolves to at least a 3-tap kernel.
///
/// # Arguments
///
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// The number of taps on each side of the center tap.
pub fn gaussian_kernel_radius(sigma: f32) -> usize {
    (3.0 * sigma as f64).ceil().max(1.0) as usize
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum to one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f64> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size as f64 - 1.0) / 2.0;
    let sigma_sq = sigma as f64 * sigma as f64;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// A normalized, symmetric 1-D gaussian kernel.
///
/// The kernel is immutable once built and is shared read-only by both filter passes.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    weights: Vec<f64>,
    radius: usize,
}

impl GaussianKernel {
    /// Build the kernel for the given sigma.
    ///
    /// # Arguments
    ///
    /// * `sigma` - The sigma of the gaussian kernel. Must be positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidSigma`] if sigma is not a positive finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// use gaussblur_imgproc::filter::kernels::GaussianKernel;
    ///
    /// let kernel = GaussianKernel::new(1.0).unwrap();
    /// assert_eq!(kernel.radius(), 3);
    /// assert_eq!(kernel.len(), 7);
    /// ```
    pub fn new(sigma: f32) -> Result<Self, FilterError> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(FilterError::InvalidSigma(sigma));
        }
        let radius = gaussian_kernel_radius(sigma);
        let weights = gaussian_kernel_1d(2 * radius + 1, sigma);
        Ok(Self { weights, radius })
    }

    /// Wrap an already normalized odd-length kernel.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernelSize`] if the kernel is empty or has an even length.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, FilterError> {
        if weights.is_empty() || weights.len() % 2 == 0 {
            return Err(FilterError::InvalidKernelSize(weights.len()));
        }
        let radius = weights.len() / 2;
        Ok(Self { weights, radius })
    }

    /// Number of taps on each side of the center tap.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Total number of taps, `2 * radius + 1`.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false, a kernel holds at least one tap.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The weights ordered from offset `-radius` to `+radius`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The weight at the given offset from the center, or `None` outside the kernel.
    pub fn weight(&self, offset: isize) -> Option<f64> {
        let idx = offset.checked_add(self.radius as isize)?;
        if idx < 0 {
            return None;
        }
        self.weights.get(idx as usize).copied()
    }

    /// Iterate over `(offset, weight)` pairs from `-radius` to `+radius`.
    pub fn taps(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        let radius = self.radius as isize;
        self.weights
            .iter()
            .enumerate()
            .map(move |(i, &w)| (i as isize - radius, w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_radius() {
        assert_eq!(gaussian_kernel_radius(1.0), 3);
        assert_eq!(gaussian_kernel_radius(0.5), 2);
        assert_eq!(gaussian_kernel_radius(2.1), 7);
        assert_eq!(gaussian_kernel_radius(0.01), 1);
        // degenerate sigmas still resolve to the minimum radius
        assert_eq!(gaussian_kernel_radius(0.0), 1);
        assert_eq!(gaussian_kernel_radius(-3.0), 1);
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (i, &k) in kernel.iter().enumerate() {
            assert_relative_eq!(k, expected[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gaussian_kernel_normalized() -> Result<(), FilterError> {
        for sigma in [0.01, 0.3, 1.0, 1.7, 4.0, 12.5] {
            let kernel = GaussianKernel::new(sigma)?;
            let sum = kernel.weights().iter().sum::<f64>();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
            assert!(kernel.weights().iter().all(|&w| w >= 0.0));
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_symmetric() -> Result<(), FilterError> {
        let kernel = GaussianKernel::new(2.3)?;
        let radius = kernel.radius() as isize;
        assert_eq!(kernel.len(), 2 * kernel.radius() + 1);
        for i in 1..=radius {
            assert_eq!(kernel.weight(i), kernel.weight(-i));
        }
        assert_eq!(kernel.weight(radius + 1), None);
        assert_eq!(kernel.weight(-radius - 1), None);
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_small_sigma() -> Result<(), FilterError> {
        let kernel = GaussianKernel::new(0.01)?;
        assert_eq!(kernel.len(), 3);
        assert_relative_eq!(kernel.weights()[1], 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_invalid_sigma() {
        assert_eq!(GaussianKernel::new(0.0), Err(FilterError::InvalidSigma(0.0)));
        assert_eq!(
            GaussianKernel::new(-1.0),
            Err(FilterError::InvalidSigma(-1.0))
        );
        assert!(GaussianKernel::new(f32::NAN).is_err());
        assert!(GaussianKernel::new(f32::INFINITY).is_err());
    }

    #[test]
    fn test_from_weights() {
        let kernel = GaussianKernel::from_weights(vec![0.25, 0.5, 0.25]);
        assert_eq!(kernel.map(|k| k.radius()), Ok(1));
        assert_eq!(
            GaussianKernel::from_weights(vec![0.5, 0.5]),
            Err(FilterError::InvalidKernelSize(2))
        );
        assert_eq!(
            GaussianKernel::from_weights(vec![]),
            Err(FilterError::InvalidKernelSize(0))
        );
    }

    #[test]
    fn test_taps_order() -> Result<(), FilterError> {
        let kernel = GaussianKernel::new(0.5)?;
        let offsets = kernel.taps().map(|(o, _)| o).collect::<Vec<_>>();
        assert_eq!(offsets, vec![-2, -1, 0, 1, 2]);
        Ok(())
    }
}
