pub mod m202601050001_create_submissions;
