mod stress_tests;
