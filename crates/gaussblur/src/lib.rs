#![doc = include_str!("../README.md")]

#[doc(inline)]
pub use gaussblur_image as image;

#[doc(inline)]
pub use gaussblur_imgproc as imgproc;

#[doc(inline)]
pub use gaussblur_io as io;
