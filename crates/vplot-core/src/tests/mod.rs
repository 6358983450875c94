mod calibration;
mod shape;
mod table;
