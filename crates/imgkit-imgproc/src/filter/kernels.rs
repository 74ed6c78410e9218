use imgkit_image::ImageError;

/// A square grid of `f64` filter weights with an odd side length.
///
/// Kernels are built by the filters themselves and are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    data: Vec<f64>,
}

impl Kernel {
    /// Create a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not odd or `data` does not hold `size * size` weights.
    pub fn new(size: usize, data: Vec<f64>) -> Result<Self, ImageError> {
        if size == 0 || size % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(size));
        }
        if data.len() != size * size {
            return Err(ImageError::InvalidChannelShape(data.len(), size * size));
        }
        Ok(Self { size, data })
    }

    /// Side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Padding needed on each side of the image to apply the kernel.
    pub fn pad(&self) -> usize {
        self.size / 2
    }

    /// Row-major weights.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Weight at `row`, `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }
}

/// Create the pair of 3x3 sobel kernels.
///
/// # Returns
///
/// The horizontal and the vertical derivative kernels.
pub fn sobel_kernels() -> (Kernel, Kernel) {
    let kernel_x = Kernel {
        size: 3,
        data: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
    };
    let kernel_y = Kernel {
        size: 3,
        data: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
    };
    (kernel_x, kernel_y)
}

/// Create the 3x3 sharpening kernel.
pub fn sharpen_kernel() -> Kernel {
    Kernel {
        size: 3,
        data: vec![-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
    }
}

/// Create a normalized gaussian-like smoothing kernel.
///
/// The weight of each cell is `exp(-d² / (2 * mid²))` where `d` is the euclidean
/// distance to the center and `mid = kernel_size / 2`. A kernel of size 1 is the
/// identity.
///
/// # Arguments
///
/// * `kernel_size` - The side of the kernel, odd.
pub fn smooth_kernel(kernel_size: usize) -> Result<Kernel, ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let mid = kernel_size / 2;
    if mid == 0 {
        return Kernel::new(1, vec![1.0]);
    }

    let two_sigma_sq = 2.0 * (mid * mid) as f64;
    let mut data = Vec::with_capacity(kernel_size * kernel_size);

    // compute the kernel
    for i in 0..kernel_size {
        for j in 0..kernel_size {
            let di = i as f64 - mid as f64;
            let dj = j as f64 - mid as f64;
            data.push((-(di * di + dj * dj) / two_sigma_sq).exp());
        }
    }

    // normalize the kernel
    let norm = data.iter().sum::<f64>();
    data.iter_mut().for_each(|k| *k /= norm);

    Kernel::new(kernel_size, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sobel_kernels() {
        let (kx, ky) = sobel_kernels();
        assert_eq!(kx.get(1, 0), -2.0);
        assert_eq!(kx.get(1, 2), 2.0);
        assert_eq!(ky.get(0, 1), -2.0);
        assert_eq!(ky.get(2, 1), 2.0);
    }

    #[test]
    fn test_smooth_kernel() -> Result<(), ImageError> {
        let kernel = smooth_kernel(5)?;
        assert_eq!(kernel.size(), 5);
        assert_eq!(kernel.pad(), 2);
        assert_relative_eq!(kernel.data().iter().sum::<f64>(), 1.0, epsilon = 1e-12);

        // symmetric and peaked at the center
        assert_relative_eq!(kernel.get(0, 0), kernel.get(4, 4));
        assert_relative_eq!(kernel.get(1, 2), kernel.get(2, 1));
        assert!(kernel.get(2, 2) > kernel.get(1, 2));
        assert!(kernel.get(1, 2) > kernel.get(0, 0));
        Ok(())
    }

    #[test]
    fn test_smooth_kernel_identity() -> Result<(), ImageError> {
        let kernel = smooth_kernel(1)?;
        assert_eq!(kernel.data(), &[1.0]);
        assert_eq!(smooth_kernel(4), Err(ImageError::InvalidKernelSize(4)));
        Ok(())
    }

    #[test]
    fn test_kernel_shape_check() {
        assert!(Kernel::new(3, vec![0.0; 8]).is_err());
        assert!(Kernel::new(2, vec![0.0; 4]).is_err());
    }
}
