//! CSC container storage backends

#[cfg(feature = "mmap")]
pub mod file;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod writer;

#[cfg(feature = "mmap")]
pub use file::ContainerFile;
#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5Source;
pub use writer::ContainerWriter;
