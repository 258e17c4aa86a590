#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use dataug_image as image;

#[doc(inline)]
pub use dataug_imgproc as imgproc;

#[doc(inline)]
pub use dataug_io as io;

#[doc(inline)]
pub use dataug_augment as augment;
