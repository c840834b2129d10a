pub mod octoprint;
