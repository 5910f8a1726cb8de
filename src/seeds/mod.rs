pub mod job_roles_seed;
