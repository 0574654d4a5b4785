pub mod filter_freelancers;
