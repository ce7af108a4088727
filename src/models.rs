//! Neuron models.
pub mod exponential_decay;
pub mod hindmarsh_rose;
pub mod hodgkin_huxley;
pub mod vavoulis;
pub mod vavoulis_cgc;
