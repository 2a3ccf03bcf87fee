pub mod bhavcopy;
