//! Component bodies written the way generated witness code reads: fixed
//! local offsets, explicit child handles, release before return.

pub mod constant_leaf;
pub mod gate;
pub mod is_zero;
pub mod main;
pub mod multiplier;
pub mod multiplier_array;
pub mod num2bits;
