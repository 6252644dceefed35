//! Grades command handler

use grade_index::grade::Grade;

/// Print the grade vocabulary, highest weight first
pub fn run() {
    println!("{:^7}|{:^8}", "Grade", "Weight");
    println!("{}", "-".repeat(15));
    for grade in Grade::ALL {
        println!("{:^7}|{:^8}", grade.label(), grade.weight());
    }
}
